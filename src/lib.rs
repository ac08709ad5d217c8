/// Pin Saver - collect page images and save them to boards
/// Built with Rust + WASM + Yew

pub mod api;
pub mod background;
pub mod config;
pub mod content;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod image_data;
pub mod selection;
pub mod storage;
pub mod transport;
pub mod ui;

use wasm_bindgen::prelude::*;

use crate::background::PageInfo;
use crate::storage::{ChromeStorage, HandoffStore};
use crate::transport::{Request, TabChannel, decode_request, encode_response};

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

fn handoff() -> HandoffStore<ChromeStorage> {
    HandoffStore::new(ChromeStorage)
}

fn js_error(e: error::AppError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Start the Yew app for the standalone web page
#[wasm_bindgen]
pub fn start_web_app() {
    yew::Renderer::<ui::web_app::WebApp>::new().render();
}

// Content scripts skip pages of the board service itself
#[wasm_bindgen]
pub fn should_activate_overlay(hostname: &str, og_site_name: Option<String>) -> bool {
    !content::is_board_site(hostname, og_site_name.as_deref())
}

#[wasm_bindgen]
pub fn background_install() {
    background::install();
}

/// `chrome.runtime.onMessage` handler for the background service worker
#[wasm_bindgen]
pub async fn background_handle_message(message: JsValue) -> Result<JsValue, JsValue> {
    let request = decode_request(message).map_err(js_error)?;
    let refresh = background::changes_selection(&request);
    let wants_popup = matches!(request, Request::OpenPopup { .. });

    let handoff = handoff();
    let response = background::handle_message(&handoff, request, js_sys::Date::now())
        .await
        .map_err(js_error)?;
    if refresh {
        background::refresh_badge(&handoff).await;
    }
    if wants_popup {
        background::open_popup().await;
    }
    encode_response(&response).map_err(js_error)
}

#[wasm_bindgen]
pub async fn background_menu_click(
    menu_id: String,
    src_url: Option<String>,
    tab_id: i32,
    page_url: String,
    page_title: String,
) -> Result<(), JsValue> {
    let page = PageInfo {
        tab_id,
        url: page_url,
        title: page_title,
    };
    let handoff = handoff();
    let outcome = background::handle_menu_click(
        &handoff,
        &menu_id,
        src_url.as_deref(),
        &page,
        &TabChannel { tab_id: page.tab_id },
        js_sys::Date::now(),
    )
    .await
    .map_err(js_error)?;

    background::refresh_badge(&handoff).await;
    background::apply_menu_outcome(&outcome).await;
    Ok(())
}

#[wasm_bindgen]
pub async fn background_alarm(name: String) {
    background::handle_alarm(&handoff(), &name, js_sys::Date::now()).await;
}

// Tabs finishing a load start with an empty badge
#[wasm_bindgen]
pub fn background_tab_loaded() {
    background::update_badge(0);
}
