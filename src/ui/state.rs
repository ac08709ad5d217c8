/// Presentation state shared by the popup and the web app
///
/// All transitions go through [`AppState::apply`], a pure function of the
/// previous state and an [`Action`]. Components only dispatch actions.
use std::rc::Rc;

use yew::functional::Reducible;

use crate::error::AppError;
use crate::image_data::{Board, ImageDescriptor, NewBoard, UserProfile};
use crate::selection::{SelectionSet, ToggleOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    SignIn,
    Images,
    Boards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
    Info,
}

/// Transient message; `id` lets a timer dismiss exactly the banner it was started for
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub id: u32,
    pub kind: BannerKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SignedIn { token: String, profile: UserProfile },
    SignedOut,
    LoadingStarted,
    ImagesLoaded(Vec<ImageDescriptor>),
    /// Selection handed over from the page or a context menu
    SelectionRestored(Vec<ImageDescriptor>),
    Toggle(String),
    SelectAll,
    ClearSelection,
    ShowBoards,
    BackToImages,
    BoardsLoaded(Vec<Board>),
    BoardCreated(Board),
    FormChanged(NewBoard),
    ToggleCreateForm,
    SaveFinished { saved_count: u32 },
    Notify(BannerKind, String),
    Failed(AppError),
    DismissBanner(u32),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub view: View,
    pub token: Option<String>,
    pub profile: Option<UserProfile>,
    pub loading: bool,
    /// True once an extraction has completed, even with no results
    pub scanned: bool,
    /// Filtered images the user can pick from
    pub candidates: Vec<ImageDescriptor>,
    pub selection: SelectionSet,
    pub boards: Vec<Board>,
    pub new_board: NewBoard,
    pub show_create_form: bool,
    pub banner: Option<Banner>,
    next_banner_id: u32,
}

impl AppState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// (found, selected)
    pub fn stats(&self) -> (usize, usize) {
        (self.candidates.len(), self.selection.count())
    }

    fn with_banner(mut self, kind: BannerKind, message: impl Into<String>) -> Self {
        self.next_banner_id += 1;
        self.banner = Some(Banner {
            id: self.next_banner_id,
            kind,
            message: message.into(),
        });
        self
    }

    pub fn apply(mut self, action: Action) -> AppState {
        match action {
            Action::SignedIn { token, profile } => {
                self.token = Some(token);
                self.profile = Some(profile);
                self.loading = false;
                if self.view == View::SignIn {
                    self.view = View::Images;
                }
                self
            }
            Action::SignedOut => {
                let next_banner_id = self.next_banner_id;
                AppState {
                    next_banner_id,
                    ..AppState::default()
                }
            }
            Action::LoadingStarted => {
                self.loading = true;
                self.banner = None;
                self
            }
            Action::ImagesLoaded(images) => {
                // Existing selections survive a refresh
                self.loading = false;
                self.scanned = true;
                self.candidates = images;
                self
            }
            Action::SelectionRestored(images) => {
                for image in images {
                    if !self.candidates.iter().any(|c| c.url == image.url) {
                        self.candidates.push(image.clone());
                    }
                    self.selection.select(image);
                }
                self
            }
            Action::Toggle(url) => {
                if self.selection.toggle(&url, &self.candidates) == ToggleOutcome::NotACandidate {
                    log::warn!("Toggle for image not on this page: {}", url);
                }
                self
            }
            Action::SelectAll => {
                self.selection.select_all(&self.candidates);
                self
            }
            Action::ClearSelection => {
                self.selection.clear();
                self
            }
            Action::ShowBoards => {
                if !self.is_authenticated() {
                    self.view = View::SignIn;
                    return self.with_banner(BannerKind::Info, "Please sign in to continue.");
                }
                if self.selection.is_empty() {
                    return self.with_banner(BannerKind::Error, "Please select images first.");
                }
                self.view = View::Boards;
                self
            }
            Action::BackToImages => {
                self.view = View::Images;
                self.show_create_form = false;
                self
            }
            Action::BoardsLoaded(boards) => {
                self.loading = false;
                self.boards = boards;
                self
            }
            Action::BoardCreated(board) => {
                self.loading = false;
                self.boards.insert(0, board);
                self.new_board = NewBoard::default();
                self.show_create_form = false;
                self
            }
            Action::FormChanged(form) => {
                self.new_board = form;
                self
            }
            Action::ToggleCreateForm => {
                self.show_create_form = !self.show_create_form;
                self
            }
            Action::SaveFinished { saved_count } => {
                self.loading = false;
                if saved_count > 0 {
                    self.selection.clear();
                    self.view = View::Images;
                    self.with_banner(
                        BannerKind::Success,
                        format!("Successfully saved {} images to board!", saved_count),
                    )
                } else {
                    self.with_banner(BannerKind::Error, "No images were saved. Please try again.")
                }
            }
            Action::Notify(kind, message) => self.with_banner(kind, message),
            Action::Failed(err) => {
                log::error!("{}", err);
                self.loading = false;
                self.with_banner(BannerKind::Error, err.user_message())
            }
            Action::DismissBanner(id) => {
                if self.banner.as_ref().is_some_and(|b| b.id == id) {
                    self.banner = None;
                }
                self
            }
        }
    }
}

impl Reducible for AppState {
    type Action = Action;

    fn reduce(self: Rc<Self>, action: Action) -> Rc<Self> {
        Rc::new((*self).clone().apply(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BoardClient;
    use crate::api::testing::FakeBackend;
    use crate::image_data::demo_boards;
    use futures::executor::block_on;

    const A: &str = "https://a.com/a.jpg";
    const B: &str = "https://a.com/b.jpg";

    fn candidates() -> Vec<ImageDescriptor> {
        vec![
            ImageDescriptor::new(A, 200, 200, "A", ""),
            ImageDescriptor::new(B, 300, 300, "B", ""),
            ImageDescriptor::new("https://a.com/c.jpg", 400, 400, "C", ""),
        ]
    }

    fn signed_in() -> AppState {
        AppState::default()
            .apply(Action::SignedIn {
                token: "tok".to_string(),
                profile: UserProfile::demo(),
            })
            .apply(Action::ImagesLoaded(candidates()))
    }

    #[test]
    fn test_sign_in_moves_to_images() {
        let state = signed_in();
        assert_eq!(state.view, View::Images);
        assert!(state.is_authenticated());
        assert_eq!(state.stats(), (3, 0));
    }

    #[test]
    fn test_show_boards_requires_sign_in() {
        let state = AppState::default()
            .apply(Action::ImagesLoaded(candidates()))
            .apply(Action::Toggle(A.to_string()))
            .apply(Action::ShowBoards);

        assert_eq!(state.view, View::SignIn);
        assert_eq!(state.banner.as_ref().map(|b| b.kind), Some(BannerKind::Info));
    }

    #[test]
    fn test_show_boards_requires_selection() {
        let state = signed_in().apply(Action::ShowBoards);
        assert_eq!(state.view, View::Images);
        assert_eq!(state.banner.unwrap().kind, BannerKind::Error);
    }

    #[test]
    fn test_stale_selection_survives_new_extraction() {
        let state = signed_in()
            .apply(Action::Toggle(A.to_string()))
            .apply(Action::ImagesLoaded(vec![ImageDescriptor::new(
                "https://other.com/x.jpg",
                500,
                500,
                "X",
                "",
            )]));

        assert!(state.selection.contains(A));
        assert_eq!(state.stats(), (1, 1));
    }

    #[test]
    fn test_select_all_then_clear() {
        let state = signed_in().apply(Action::SelectAll);
        assert_eq!(state.selection.count(), 3);
        assert_eq!(state.apply(Action::ClearSelection).selection.count(), 0);
    }

    #[test]
    fn test_save_with_zero_saved_keeps_selection() {
        let state = signed_in()
            .apply(Action::Toggle(A.to_string()))
            .apply(Action::ShowBoards)
            .apply(Action::LoadingStarted)
            .apply(Action::SaveFinished { saved_count: 0 });

        assert_eq!(state.view, View::Boards);
        assert_eq!(state.selection.count(), 1);
        assert_eq!(
            state.banner.unwrap().message,
            "No images were saved. Please try again."
        );
    }

    #[test]
    fn test_failure_leaves_prior_state() {
        let before = signed_in().apply(Action::Toggle(B.to_string()));
        let after = before
            .clone()
            .apply(Action::LoadingStarted)
            .apply(Action::Failed(AppError::Network("offline".to_string())));

        assert!(!after.loading);
        assert_eq!(after.selection, before.selection);
        assert_eq!(after.banner.unwrap().kind, BannerKind::Error);
    }

    #[test]
    fn test_stale_dismiss_keeps_newer_banner() {
        let state = signed_in()
            .apply(Action::Notify(BannerKind::Info, "first".to_string()))
            .apply(Action::Notify(BannerKind::Info, "second".to_string()));
        let first_id = state.banner.as_ref().unwrap().id - 1;

        let state = state.apply(Action::DismissBanner(first_id));
        assert_eq!(state.banner.as_ref().unwrap().message, "second");

        let id = state.banner.as_ref().unwrap().id;
        assert!(state.apply(Action::DismissBanner(id)).banner.is_none());
    }

    #[test]
    fn test_board_created_is_prepended_and_form_reset() {
        let state = signed_in()
            .apply(Action::BoardsLoaded(demo_boards()))
            .apply(Action::ToggleCreateForm)
            .apply(Action::FormChanged(NewBoard {
                name: "Kitchens".to_string(),
                ..Default::default()
            }))
            .apply(Action::BoardCreated(Board {
                id: "new".to_string(),
                name: "Kitchens".to_string(),
                description: String::new(),
                image_count: 0,
                is_private: false,
                url: None,
            }));

        assert_eq!(state.boards[0].id, "new");
        assert_eq!(state.boards.len(), 3);
        assert_eq!(state.new_board, NewBoard::default());
        assert!(!state.show_create_form);
    }

    #[test]
    fn test_selection_restored_becomes_candidates() {
        let handed_over = vec![ImageDescriptor::new("https://cdn.com/ctx.jpg", 0, 0, "Ctx", "")];
        let state = signed_in().apply(Action::SelectionRestored(handed_over));

        assert!(state.selection.contains("https://cdn.com/ctx.jpg"));
        assert_eq!(state.candidates.len(), 4);
    }

    #[test]
    fn test_sign_out_resets() {
        let state = signed_in().apply(Action::SelectAll).apply(Action::SignedOut);
        assert_eq!(state.view, View::SignIn);
        assert!(!state.is_authenticated());
        assert!(state.selection.is_empty());
    }

    #[test]
    fn test_select_two_and_save_end_to_end() {
        let backend = FakeBackend::new();
        backend.respond("POST", "/api/boards/b1/save-images", 200, r#"{"saved_count":2}"#);
        let client = BoardClient::with_backend("http://backend", backend);

        let state = signed_in()
            .apply(Action::Toggle(A.to_string()))
            .apply(Action::Toggle(B.to_string()))
            .apply(Action::ShowBoards);
        assert_eq!(state.view, View::Boards);

        let token = state.token.clone().unwrap();
        let images = state.selection.images().to_vec();
        let state = state.apply(Action::LoadingStarted);

        let result = block_on(client.save_images(&token, "b1", &images)).unwrap();
        let state = state.apply(Action::SaveFinished {
            saved_count: result.saved_count,
        });

        assert!(state.selection.is_empty());
        assert_eq!(state.view, View::Images);
        let banner = state.banner.unwrap();
        assert_eq!(banner.kind, BannerKind::Success);
        assert_eq!(banner.message, "Successfully saved 2 images to board!");

        let sent = &client.backend().requests()[0];
        let urls: Vec<&str> = sent.body.as_ref().unwrap()["images"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["url"].as_str().unwrap())
            .collect();
        assert_eq!(urls, vec![A, B]);
    }
}
