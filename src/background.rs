/// Background (control agent) logic: message routing, context menus, badge

use wasm_bindgen::prelude::*;

use crate::config::{BADGE_COLOR, CLEANUP_ALARM, CLEANUP_PERIOD_MINUTES};
use crate::error::{AppError, Result};
use crate::filter::filter_images;
use crate::image_data::ImageDescriptor;
use crate::storage::{HandoffStore, KeyValueStore};
use crate::transport::{self, MessageChannel, Request, Response};

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn openPopup() -> std::result::Result<(), JsValue>;

    fn setBadge(text: &str, color: &str);

    fn showNotification(title: &str, message: &str);

    fn createContextMenu(id: &str, title: &str, context: &str);

    fn createAlarm(name: &str, period_minutes: u32);
}

pub const SAVE_IMAGE_MENU: &str = "pinterest-save-image";
pub const EXTRACT_IMAGES_MENU: &str = "pinterest-extract-images";
pub const NOTIFICATION_TITLE: &str = "Pinterest Extension";
pub const NO_IMAGES_MESSAGE: &str = "No images found on this page";

/// Page the user right-clicked on
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub tab_id: i32,
    pub url: String,
    pub title: String,
}

/// What the background should do after a context-menu action
#[derive(Debug, Clone, PartialEq)]
pub enum MenuOutcome {
    OpenPopup,
    Notify(String),
    Ignored,
}

/// Answer a message from the popup or a content script
pub async fn handle_message<S: KeyValueStore>(
    handoff: &HandoffStore<S>,
    request: Request,
    now_ms: f64,
) -> Result<Response> {
    log::debug!("background handling {:?}", request);
    match request {
        Request::GetSelectedImages => Ok(Response::Images(handoff.selected_images().await?)),
        Request::SetSelectedImages { images } => {
            handoff.set_selected_images(&images, now_ms).await?;
            Ok(Response::ok())
        }
        Request::SaveComplete => {
            handoff.save_complete().await?;
            Ok(Response::ok())
        }
        Request::OpenPopup { selected_images } => {
            if let Some(images) = selected_images {
                handoff.set_selected_images(&images, now_ms).await?;
            }
            Ok(Response::ok())
        }
        Request::ExtractImages | Request::ActivateExtension | Request::DeactivateExtension => {
            Ok(Response::rejected())
        }
    }
}

/// Descriptor for a single image saved from the image context menu
pub fn context_image(src_url: &str, page: &PageInfo) -> ImageDescriptor {
    ImageDescriptor {
        url: src_url.to_string(),
        width: 0,
        height: 0,
        title: format!("Image from {}", page.url),
        description: format!("Saved from {}", page.title),
    }
}

pub async fn save_image_from_menu<S: KeyValueStore>(
    handoff: &HandoffStore<S>,
    src_url: &str,
    page: &PageInfo,
    now_ms: f64,
) -> Result<MenuOutcome> {
    handoff
        .set_selected_images(&[context_image(src_url, page)], now_ms)
        .await?;
    Ok(MenuOutcome::OpenPopup)
}

/// Scan the page through its content script and hand the large images to the popup
pub async fn extract_images_from_menu<S: KeyValueStore, C: MessageChannel>(
    handoff: &HandoffStore<S>,
    page_channel: &C,
    now_ms: f64,
) -> Result<MenuOutcome> {
    let images = transport::extract_images(page_channel).await?;
    if images.is_empty() {
        return Ok(MenuOutcome::Notify(NO_IMAGES_MESSAGE.to_string()));
    }

    let filtered = filter_images(&images);
    log::info!("Extracted {} images, {} large enough", images.len(), filtered.len());
    handoff.set_extracted_images(&filtered, now_ms).await?;
    Ok(MenuOutcome::OpenPopup)
}

pub async fn handle_menu_click<S: KeyValueStore, C: MessageChannel>(
    handoff: &HandoffStore<S>,
    menu_id: &str,
    src_url: Option<&str>,
    page: &PageInfo,
    page_channel: &C,
    now_ms: f64,
) -> Result<MenuOutcome> {
    match (menu_id, src_url) {
        (SAVE_IMAGE_MENU, Some(src)) => save_image_from_menu(handoff, src, page, now_ms).await,
        (SAVE_IMAGE_MENU, None) => Err(AppError::NotFound("No image under the cursor".to_string())),
        (EXTRACT_IMAGES_MENU, _) => extract_images_from_menu(handoff, page_channel, now_ms).await,
        _ => Ok(MenuOutcome::Ignored),
    }
}

/// Some browsers refuse without a user gesture; the handoff is kept either way
pub async fn open_popup() {
    if let Err(e) = openPopup().await {
        log::warn!("Could not open popup: {:?}", e);
    }
}

pub async fn apply_menu_outcome(outcome: &MenuOutcome) {
    match outcome {
        MenuOutcome::OpenPopup => open_popup().await,
        MenuOutcome::Notify(message) => showNotification(NOTIFICATION_TITLE, message),
        MenuOutcome::Ignored => {}
    }
}

pub fn badge_text(count: usize) -> String {
    if count > 0 {
        count.to_string()
    } else {
        String::new()
    }
}

pub fn update_badge(count: usize) {
    setBadge(&badge_text(count), BADGE_COLOR);
}

/// Requests after which the badge must show the new selection count
pub fn changes_selection(request: &Request) -> bool {
    matches!(
        request,
        Request::SetSelectedImages { .. } | Request::SaveComplete | Request::OpenPopup { selected_images: Some(_) }
    )
}

pub async fn refresh_badge<S: KeyValueStore>(handoff: &HandoffStore<S>) {
    match handoff.selected_images().await {
        Ok(images) => update_badge(images.len()),
        Err(e) => log::warn!("Badge not updated: {}", e),
    }
}

/// Register context menus and the hourly cleanup alarm
pub fn install() {
    log::info!("Pinterest Extension installed");
    createContextMenu(SAVE_IMAGE_MENU, "Save to Pinterest", "image");
    createContextMenu(EXTRACT_IMAGES_MENU, "Extract all images", "page");
    createAlarm(CLEANUP_ALARM, CLEANUP_PERIOD_MINUTES);
}

pub async fn handle_alarm<S: KeyValueStore>(handoff: &HandoffStore<S>, name: &str, now_ms: f64) {
    if name != CLEANUP_ALARM {
        return;
    }
    if let Err(e) = handoff.cleanup_expired(now_ms).await {
        log::error!("Cleanup failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use futures::executor::block_on;

    const NOW: f64 = 1_698_508_200_000.0;

    /// Stands in for a tab's content script
    struct FakePage(Vec<ImageDescriptor>);

    impl MessageChannel for FakePage {
        async fn request(&self, request: &Request) -> Result<Response> {
            match request {
                Request::ExtractImages => Ok(Response::Images(self.0.clone())),
                _ => Ok(Response::rejected()),
            }
        }
    }

    /// Routes popup requests straight into `handle_message`
    struct Loopback(HandoffStore<MemoryStore>);

    impl MessageChannel for Loopback {
        async fn request(&self, request: &Request) -> Result<Response> {
            handle_message(&self.0, request.clone(), NOW).await
        }
    }

    fn page() -> PageInfo {
        PageInfo {
            tab_id: 7,
            url: "https://blog.example.com/post".to_string(),
            title: "A Post".to_string(),
        }
    }

    fn images() -> Vec<ImageDescriptor> {
        vec![
            ImageDescriptor::new("https://a.com/small.png", 40, 40, "Small", ""),
            ImageDescriptor::new("https://a.com/big.jpg", 800, 600, "Big", ""),
        ]
    }

    #[test]
    fn test_selected_images_handoff_through_messages() {
        let channel = Loopback(HandoffStore::new(MemoryStore::new()));

        assert!(block_on(transport::get_selected_images(&channel)).unwrap().is_empty());
        block_on(transport::set_selected_images(&channel, &images())).unwrap();
        assert_eq!(block_on(transport::get_selected_images(&channel)).unwrap(), images());

        block_on(transport::save_complete(&channel)).unwrap();
        assert!(block_on(transport::get_selected_images(&channel)).unwrap().is_empty());
    }

    #[test]
    fn test_open_popup_stores_selection() {
        let channel = Loopback(HandoffStore::new(MemoryStore::new()));
        block_on(transport::open_popup(&channel, &images())).unwrap();

        assert_eq!(block_on(channel.0.selected_images()).unwrap().len(), 2);
    }

    #[test]
    fn test_page_only_requests_are_rejected() {
        let handoff = HandoffStore::new(MemoryStore::new());
        let response = block_on(handle_message(&handoff, Request::ExtractImages, NOW)).unwrap();
        assert_eq!(response, Response::rejected());
    }

    #[test]
    fn test_save_image_menu() {
        let handoff = HandoffStore::new(MemoryStore::new());
        let outcome = block_on(handle_menu_click(
            &handoff,
            SAVE_IMAGE_MENU,
            Some("https://cdn.example.com/cat.jpg"),
            &page(),
            &FakePage(vec![]),
            NOW,
        ))
        .unwrap();

        assert_eq!(outcome, MenuOutcome::OpenPopup);
        let selected = block_on(handoff.selected_images()).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].url, "https://cdn.example.com/cat.jpg");
        assert_eq!(selected[0].title, "Image from https://blog.example.com/post");
        assert_eq!(selected[0].description, "Saved from A Post");
        assert_eq!((selected[0].width, selected[0].height), (0, 0));
    }

    #[test]
    fn test_extract_menu_filters_and_stores() {
        let handoff = HandoffStore::new(MemoryStore::new());
        let outcome = block_on(handle_menu_click(
            &handoff,
            EXTRACT_IMAGES_MENU,
            None,
            &page(),
            &FakePage(images()),
            NOW,
        ))
        .unwrap();

        assert_eq!(outcome, MenuOutcome::OpenPopup);
        let extracted = block_on(handoff.extracted_images()).unwrap();
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].url, "https://a.com/big.jpg");
    }

    #[test]
    fn test_extract_menu_on_empty_page_notifies() {
        let handoff = HandoffStore::new(MemoryStore::new());
        let outcome = block_on(extract_images_from_menu(&handoff, &FakePage(vec![]), NOW)).unwrap();

        assert_eq!(outcome, MenuOutcome::Notify(NO_IMAGES_MESSAGE.to_string()));
        assert!(handoff.store().is_empty());
    }

    #[test]
    fn test_unknown_menu_is_ignored() {
        let handoff = HandoffStore::new(MemoryStore::new());
        let outcome = block_on(handle_menu_click(&handoff, "other", None, &page(), &FakePage(vec![]), NOW)).unwrap();
        assert_eq!(outcome, MenuOutcome::Ignored);
    }

    #[test]
    fn test_badge_text() {
        assert_eq!(badge_text(0), "");
        assert_eq!(badge_text(3), "3");
    }

    #[test]
    fn test_changes_selection() {
        assert!(changes_selection(&Request::SetSelectedImages { images: images() }));
        assert!(changes_selection(&Request::SaveComplete));
        assert!(changes_selection(&Request::OpenPopup { selected_images: Some(vec![]) }));
        assert!(!changes_selection(&Request::OpenPopup { selected_images: None }));
        assert!(!changes_selection(&Request::GetSelectedImages));
    }

    #[test]
    fn test_cleanup_alarm() {
        let handoff = HandoffStore::new(MemoryStore::new());
        block_on(handoff.set_extracted_images(&images(), NOW)).unwrap();

        block_on(handle_alarm(&handoff, "something-else", NOW + 7_200_000.0));
        assert_eq!(handoff.store().len(), 1);

        block_on(handle_alarm(&handoff, CLEANUP_ALARM, NOW + 7_200_000.0));
        assert!(handoff.store().is_empty());
    }
}
