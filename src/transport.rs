/// Typed request/response messaging between the page, background and popup

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::{AppError, Result};
use crate::image_data::ImageDescriptor;
use crate::storage::to_js;

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendTabMessage(tab_id: i32, message: JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTabId() -> std::result::Result<JsValue, JsValue>;
}

/// Messages understood by the background and content agents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    ExtractImages,
    GetSelectedImages,
    SetSelectedImages {
        images: Vec<ImageDescriptor>,
    },
    SaveComplete,
    OpenPopup {
        #[serde(rename = "selectedImages", default, skip_serializing_if = "Option::is_none")]
        selected_images: Option<Vec<ImageDescriptor>>,
    },
    ActivateExtension,
    DeactivateExtension,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Response {
    Images(Vec<ImageDescriptor>),
    Ack { success: bool },
}

impl Response {
    pub fn ok() -> Response {
        Response::Ack { success: true }
    }

    pub fn rejected() -> Response {
        Response::Ack { success: false }
    }
}

/// One round trip to another extension context
#[allow(async_fn_in_trait)]
pub trait MessageChannel {
    async fn request(&self, request: &Request) -> Result<Response>;
}

/// `chrome.runtime.sendMessage`: popup or content script to background
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeChannel;

/// `chrome.tabs.sendMessage`: extension to the content script of one tab
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabChannel {
    pub tab_id: i32,
}

impl TabChannel {
    pub async fn active() -> Result<TabChannel> {
        let id = getActiveTabId()
            .await
            .map_err(|e| AppError::Transport(format!("No active tab: {:?}", e)))?;
        let tab_id = id
            .as_f64()
            .ok_or_else(|| AppError::Transport("No active tab".to_string()))?;
        Ok(TabChannel { tab_id: tab_id as i32 })
    }
}

fn decode_response(js: JsValue) -> Result<Response> {
    if js.is_null() || js.is_undefined() {
        return Err(AppError::Transport("No response from receiver".to_string()));
    }
    Ok(serde_wasm_bindgen::from_value(js)?)
}

impl MessageChannel for RuntimeChannel {
    async fn request(&self, request: &Request) -> Result<Response> {
        log::debug!("runtime <- {:?}", request);
        let js = sendRuntimeMessage(to_js(request)?)
            .await
            .map_err(|e| AppError::Transport(format!("{:?}", e)))?;
        decode_response(js)
    }
}

impl MessageChannel for TabChannel {
    async fn request(&self, request: &Request) -> Result<Response> {
        log::debug!("tab {} <- {:?}", self.tab_id, request);
        let js = sendTabMessage(self.tab_id, to_js(request)?)
            .await
            .map_err(|e| AppError::Transport(format!("{:?}", e)))?;
        decode_response(js)
    }
}

/// Decode a message handed to a listener by the host
pub fn decode_request(js: JsValue) -> Result<Request> {
    Ok(serde_wasm_bindgen::from_value(js)?)
}

pub fn encode_response(response: &Response) -> Result<JsValue> {
    to_js(response)
}

fn unexpected(request: &Request, response: Response) -> AppError {
    AppError::Transport(format!("Unexpected reply to {:?}: {:?}", request, response))
}

async fn request_images<C: MessageChannel>(channel: &C, request: Request) -> Result<Vec<ImageDescriptor>> {
    match channel.request(&request).await? {
        Response::Images(images) => Ok(images),
        other => Err(unexpected(&request, other)),
    }
}

async fn request_ack<C: MessageChannel>(channel: &C, request: Request) -> Result<()> {
    match channel.request(&request).await? {
        Response::Ack { success: true } => Ok(()),
        other => Err(unexpected(&request, other)),
    }
}

/// Ask the page-scan agent for every image on its page; empty is not an error
pub async fn extract_images<C: MessageChannel>(channel: &C) -> Result<Vec<ImageDescriptor>> {
    request_images(channel, Request::ExtractImages).await
}

pub async fn get_selected_images<C: MessageChannel>(channel: &C) -> Result<Vec<ImageDescriptor>> {
    request_images(channel, Request::GetSelectedImages).await
}

pub async fn set_selected_images<C: MessageChannel>(channel: &C, images: &[ImageDescriptor]) -> Result<()> {
    request_ack(
        channel,
        Request::SetSelectedImages {
            images: images.to_vec(),
        },
    )
    .await
}

pub async fn save_complete<C: MessageChannel>(channel: &C) -> Result<()> {
    request_ack(channel, Request::SaveComplete).await
}

pub async fn open_popup<C: MessageChannel>(channel: &C, selected: &[ImageDescriptor]) -> Result<()> {
    request_ack(
        channel,
        Request::OpenPopup {
            selected_images: Some(selected.to_vec()),
        },
    )
    .await
}
