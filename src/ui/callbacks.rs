/// Callbacks shared by the popup and the web app
///
/// Only image extraction differs between the two UIs; everything else is wired
/// here against a [`Host`].
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::image_data::NewBoard;
use crate::ui::state::{Action, AppState};
use crate::ui::tasks::{self, Host};

pub struct BoardCallbacks {
    pub on_login: Callback<String>,
    pub on_logout: Callback<()>,
    pub on_toggle: Callback<String>,
    pub on_select_all: Callback<()>,
    pub on_clear: Callback<()>,
    pub on_next: Callback<()>,
    pub on_back: Callback<()>,
    pub on_save: Callback<String>,
    pub on_form_change: Callback<NewBoard>,
    pub on_toggle_form: Callback<()>,
    pub on_create: Callback<()>,
    pub on_dismiss: Callback<u32>,
}

pub fn board_callbacks<H: Host>(state: &UseReducerHandle<AppState>, host: &H) -> BoardCallbacks {
    let on_login = {
        let dispatch = state.dispatcher();
        let host = host.clone();
        Callback::from(move |token: String| {
            let dispatch = dispatch.clone();
            let host = host.clone();
            spawn_local(async move {
                tasks::sign_in(&host.handoff(), &host.client(), token, &dispatch).await;
            });
        })
    };

    let on_logout = {
        let dispatch = state.dispatcher();
        let host = host.clone();
        Callback::from(move |_| {
            let dispatch = dispatch.clone();
            let host = host.clone();
            spawn_local(async move {
                tasks::sign_out(&host.handoff(), &dispatch).await;
            });
        })
    };

    let on_toggle = {
        let dispatch = state.dispatcher();
        Callback::from(move |url: String| dispatch.dispatch(Action::Toggle(url)))
    };

    let on_select_all = {
        let dispatch = state.dispatcher();
        Callback::from(move |_| dispatch.dispatch(Action::SelectAll))
    };

    let on_clear = {
        let dispatch = state.dispatcher();
        Callback::from(move |_| dispatch.dispatch(Action::ClearSelection))
    };

    let on_next = {
        let state = state.clone();
        let host = host.clone();
        Callback::from(move |_| {
            // Boards are fetched only when the reducer will switch to them
            let token = state.token.clone().filter(|_| !state.selection.is_empty());
            state.dispatch(Action::ShowBoards);
            let Some(token) = token else {
                return;
            };

            let images = state.selection.images().to_vec();
            let dispatch = state.dispatcher();
            let host = host.clone();
            spawn_local(async move {
                if let Err(e) = host.keep_selection(&images).await {
                    log::warn!("Selection not kept: {}", e);
                }
                tasks::load_boards(&host.client(), &token, &dispatch).await;
            });
        })
    };

    let on_back = {
        let dispatch = state.dispatcher();
        Callback::from(move |_| dispatch.dispatch(Action::BackToImages))
    };

    let on_save = {
        let state = state.clone();
        let host = host.clone();
        Callback::from(move |board_id: String| {
            let Some(token) = state.token.clone() else {
                state.dispatch(Action::ShowBoards);
                return;
            };
            let images = state.selection.images().to_vec();
            let dispatch = state.dispatcher();
            let host = host.clone();
            spawn_local(async move {
                let saved = tasks::save_to_board(&host.client(), &token, &board_id, images, &dispatch).await;
                if saved > 0 {
                    if let Err(e) = host.save_complete().await {
                        log::warn!("Could not clear handed-off images: {}", e);
                    }
                }
            });
        })
    };

    let on_form_change = {
        let dispatch = state.dispatcher();
        Callback::from(move |form| dispatch.dispatch(Action::FormChanged(form)))
    };

    let on_toggle_form = {
        let dispatch = state.dispatcher();
        Callback::from(move |_| dispatch.dispatch(Action::ToggleCreateForm))
    };

    let on_create = {
        let state = state.clone();
        let host = host.clone();
        Callback::from(move |_| {
            let Some(token) = state.token.clone() else {
                return;
            };
            let form = state.new_board.clone();
            let dispatch = state.dispatcher();
            let host = host.clone();
            spawn_local(async move {
                tasks::create_board(&host.client(), &token, form, &dispatch).await;
            });
        })
    };

    let on_dismiss = {
        let dispatch = state.dispatcher();
        Callback::from(move |id| dispatch.dispatch(Action::DismissBanner(id)))
    };

    BoardCallbacks {
        on_login,
        on_logout,
        on_toggle,
        on_select_all,
        on_clear,
        on_next,
        on_back,
        on_save,
        on_form_change,
        on_toggle_form,
        on_create,
        on_dismiss,
    }
}
