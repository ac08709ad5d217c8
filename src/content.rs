/// Content script (page-scan agent): extraction requests and the in-page overlay

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::error::{AppError, Result};
use crate::extractor::{ImageElement, extract_images, snapshot_document};
use crate::filter::MIN_IMAGE_DIMENSION;
use crate::image_data::ImageDescriptor;
use crate::selection::{SelectionSet, ToggleOutcome};
use crate::storage::to_js;
use crate::transport::{self, Request, Response, RuntimeChannel, decode_request, encode_response};

pub const NOTHING_SELECTED: &str = "Please select at least one image first.";

/// Selection overlay shown on top of the page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayState {
    active: bool,
    selectable: Vec<ImageDescriptor>,
    selection: SelectionSet,
}

impl OverlayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selectable(&self) -> &[ImageDescriptor] {
        &self.selectable
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Mark every loaded http image larger than the minimum as selectable
    pub fn activate(&mut self, page: &[ImageElement]) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.selectable = page
            .iter()
            .enumerate()
            .filter(|(_, el)| {
                el.has_http_source()
                    && el.natural_width > MIN_IMAGE_DIMENSION
                    && el.natural_height > MIN_IMAGE_DIMENSION
            })
            .map(|(position, el)| el.describe(position))
            .collect();
        log::info!("Overlay active, {} selectable images", self.selectable.len());
        true
    }

    pub fn deactivate(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        self.selectable.clear();
        self.selection.clear();
        true
    }

    pub fn toggle(&mut self, url: &str) -> ToggleOutcome {
        if !self.active {
            return ToggleOutcome::NotACandidate;
        }
        self.selection.toggle(url, &self.selectable)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.selectable);
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// (found, selected)
    pub fn stats(&self) -> (usize, usize) {
        (self.selectable.len(), self.selection.count())
    }

    pub fn selection_for_save(&self) -> Result<Vec<ImageDescriptor>> {
        if self.selection.is_empty() {
            return Err(AppError::NotFound(NOTHING_SELECTED.to_string()));
        }
        Ok(self.selection.images().to_vec())
    }

    /// Alt+P flips the overlay; returns true when the key was handled
    pub fn handle_key(&mut self, alt: bool, key: &str, page: &[ImageElement]) -> bool {
        if !alt || key != "p" {
            return false;
        }
        if self.active {
            self.deactivate();
        } else {
            self.activate(page);
        }
        true
    }

    pub fn handle_request(&mut self, request: &Request, page: &[ImageElement]) -> Response {
        match request {
            Request::ExtractImages => Response::Images(extract_images(page).collect()),
            Request::ActivateExtension => {
                self.activate(page);
                Response::ok()
            }
            Request::DeactivateExtension => {
                self.deactivate();
                Response::ok()
            }
            _ => Response::rejected(),
        }
    }
}

/// Pages of the board service itself are left alone
pub fn is_board_site(hostname: &str, og_site_name: Option<&str>) -> bool {
    hostname.contains("pinterest")
        || og_site_name.is_some_and(|name| name.to_lowercase().contains("pinterest"))
}

fn current_page() -> Result<Vec<ImageElement>> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| AppError::Transport("No document".to_string()))?;
    snapshot_document(&document)
}

fn js_error(e: AppError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One per page, held by the content-script glue (`content.js`)
#[wasm_bindgen]
#[derive(Default)]
pub struct ContentAgent {
    overlay: OverlayState,
}

#[wasm_bindgen]
impl ContentAgent {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ContentAgent {
        ContentAgent::default()
    }

    /// Answer a `chrome.runtime.onMessage` request
    pub fn handle_message(&mut self, message: JsValue) -> std::result::Result<JsValue, JsValue> {
        let request = decode_request(message).map_err(js_error)?;
        let page = current_page().map_err(js_error)?;
        let response = self.overlay.handle_request(&request, &page);
        encode_response(&response).map_err(js_error)
    }

    pub fn handle_key(&mut self, alt: bool, key: &str) -> bool {
        match current_page() {
            Ok(page) => self.overlay.handle_key(alt, key, &page),
            Err(e) => {
                log::error!("{}", e);
                false
            }
        }
    }

    /// Returns true when the image is now selected
    pub fn toggle_image(&mut self, url: &str) -> bool {
        self.overlay.toggle(url) == ToggleOutcome::Selected
    }

    pub fn select_all(&mut self) {
        self.overlay.select_all();
    }

    pub fn clear(&mut self) {
        self.overlay.clear();
    }

    pub fn deactivate(&mut self) {
        self.overlay.deactivate();
    }

    pub fn is_active(&self) -> bool {
        self.overlay.is_active()
    }

    pub fn stats_text(&self) -> String {
        let (found, selected) = self.overlay.stats();
        format!("{} found • {} selected", found, selected)
    }

    pub fn selectable_urls(&self) -> std::result::Result<JsValue, JsValue> {
        let urls: Vec<&str> = self.overlay.selectable().iter().map(|i| i.url.as_str()).collect();
        to_js(&urls).map_err(js_error)
    }

    pub fn selected_urls(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.overlay.selection().urls()).map_err(js_error)
    }

    /// Hand the selection to the background and open the popup
    pub fn save_selection(&self) -> std::result::Result<(), JsValue> {
        let images = self.overlay.selection_for_save().map_err(js_error)?;
        spawn_local(async move {
            if let Err(e) = transport::open_popup(&RuntimeChannel, &images).await {
                log::error!("Could not hand off selection: {}", e);
            }
        });
        Ok(())
    }
}
