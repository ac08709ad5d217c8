/// Async work shared by the popup and the web app
///
/// Each task performs its I/O and reports the outcome by dispatching [`Action`]s.
use yew::functional::UseReducerDispatcher;

use crate::api::{BoardClient, HttpBackend};
use crate::config::Config;
use crate::error::Result;
use crate::filter::filter_with_fallback;
use crate::image_data::{ImageDescriptor, NewBoard, UserProfile};
use crate::storage::{HandoffStore, KeyValueStore};
use crate::ui::state::{Action, AppState, BannerKind};

pub type Dispatch = UseReducerDispatcher<AppState>;

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Where a UI keeps its session and exchanges the selected-images handoff
#[allow(async_fn_in_trait)]
pub trait Host: Clone + 'static {
    type Store: KeyValueStore;

    fn handoff(&self) -> HandoffStore<Self::Store>;

    fn client(&self) -> BoardClient {
        BoardClient::new(Config::from_env())
    }

    /// Images handed over by the page or a context menu
    async fn selected_images(&self) -> Result<Vec<ImageDescriptor>>;

    /// Keep the selection so it survives the UI closing before a save
    async fn keep_selection(&self, images: &[ImageDescriptor]) -> Result<()>;

    /// The handed-over selection has been saved
    async fn save_complete(&self) -> Result<()>;
}

/// Restore the session and any images handed over while the UI was closed
pub async fn restore<H: Host>(host: &H, dispatch: &Dispatch) {
    let handoff = host.handoff();
    match handoff.access_token().await {
        Ok(Some(token)) => {
            let profile = handoff
                .user_profile()
                .await
                .ok()
                .flatten()
                .unwrap_or_else(UserProfile::demo);
            dispatch.dispatch(Action::SignedIn { token, profile });
        }
        Ok(None) => {}
        Err(e) => dispatch.dispatch(Action::Failed(e)),
    }

    match handoff.extracted_images().await {
        Ok(images) if !images.is_empty() => dispatch.dispatch(Action::ImagesLoaded(images)),
        Ok(_) => {}
        Err(e) => log::warn!("Ignoring extracted images: {}", e),
    }

    match host.selected_images().await {
        Ok(images) if !images.is_empty() => {
            log::info!("Restoring {} handed-off images", images.len());
            dispatch.dispatch(Action::SelectionRestored(images));
        }
        Ok(_) => {}
        Err(e) => log::warn!("Ignoring selected images: {}", e),
    }
}

/// Profile lookup failures fall back to the demo profile
pub async fn sign_in<S: KeyValueStore, H: HttpBackend>(
    handoff: &HandoffStore<S>,
    client: &BoardClient<H>,
    token: String,
    dispatch: &Dispatch,
) {
    dispatch.dispatch(Action::LoadingStarted);

    let profile = match client.fetch_profile(&token).await {
        Ok(profile) => profile,
        Err(e) => {
            log::warn!("Profile lookup failed, using demo profile: {}", e);
            UserProfile::demo()
        }
    };

    match handoff.set_session(&token, &profile).await {
        Ok(()) => {
            dispatch.dispatch(Action::SignedIn { token, profile });
            dispatch.dispatch(Action::Notify(BannerKind::Success, "Successfully logged in!".to_string()));
        }
        Err(e) => dispatch.dispatch(Action::Failed(e)),
    }
}

pub async fn sign_out<S: KeyValueStore>(handoff: &HandoffStore<S>, dispatch: &Dispatch) {
    match handoff.clear_session().await {
        Ok(()) => dispatch.dispatch(Action::SignedOut),
        Err(e) => dispatch.dispatch(Action::Failed(e)),
    }
}

/// Filter freshly extracted images and remember them for the next popup open
pub async fn show_extracted<S: KeyValueStore, H: HttpBackend>(
    handoff: &HandoffStore<S>,
    client: &BoardClient<H>,
    extracted: Result<Vec<ImageDescriptor>>,
    dispatch: &Dispatch,
) {
    let images = match extracted {
        Ok(images) => images,
        Err(e) => {
            dispatch.dispatch(Action::Failed(e));
            return;
        }
    };

    let filtered = filter_with_fallback(client, &images).await;
    log::info!("Found {} images, {} large enough", images.len(), filtered.len());

    if let Err(e) = handoff.set_extracted_images(&filtered, now_ms()).await {
        log::warn!("Could not store extracted images: {}", e);
    }
    dispatch.dispatch(Action::ImagesLoaded(filtered));
}

pub async fn load_boards<H: HttpBackend>(client: &BoardClient<H>, token: &str, dispatch: &Dispatch) {
    dispatch.dispatch(Action::LoadingStarted);
    match client.list_boards(token).await {
        Ok(boards) => dispatch.dispatch(Action::BoardsLoaded(boards)),
        Err(e) => dispatch.dispatch(Action::Failed(e)),
    }
}

pub async fn create_board<H: HttpBackend>(
    client: &BoardClient<H>,
    token: &str,
    form: NewBoard,
    dispatch: &Dispatch,
) {
    if let Err(e) = form.validate() {
        dispatch.dispatch(Action::Failed(e));
        return;
    }

    dispatch.dispatch(Action::LoadingStarted);
    match client.create_board(token, &form).await {
        Ok(board) => {
            let message = format!("Board \"{}\" created!", board.name);
            dispatch.dispatch(Action::BoardCreated(board));
            dispatch.dispatch(Action::Notify(BannerKind::Success, message));
        }
        Err(e) => dispatch.dispatch(Action::Failed(e)),
    }
}

/// Returns the number of images the service accepted
pub async fn save_to_board<H: HttpBackend>(
    client: &BoardClient<H>,
    token: &str,
    board_id: &str,
    images: Vec<ImageDescriptor>,
    dispatch: &Dispatch,
) -> u32 {
    dispatch.dispatch(Action::LoadingStarted);
    match client.save_images(token, board_id, &images).await {
        Ok(response) => {
            let saved_count = response.saved_count;
            dispatch.dispatch(Action::SaveFinished { saved_count });
            saved_count
        }
        Err(e) => {
            dispatch.dispatch(Action::Failed(e));
            0
        }
    }
}
