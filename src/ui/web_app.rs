/// Standalone web app: extract images from any page URL through the backend

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use patternfly_yew::prelude::*;

use crate::error::{AppError, Result};
use crate::image_data::ImageDescriptor;
use crate::storage::{HandoffStore, LocalStorage};
use crate::ui::callbacks::board_callbacks;
use crate::ui::components::{BannerView, BoardsPanel, ImageGrid, SelectionBar, SignInPanel, UserBar};
use crate::ui::state::{Action, AppState, BannerKind, View};
use crate::ui::tasks::{self, Host};

/// Everything lives in `window.localStorage`; there is no background to hand over to
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WebHost;

impl Host for WebHost {
    type Store = LocalStorage;

    fn handoff(&self) -> HandoffStore<LocalStorage> {
        HandoffStore::new(LocalStorage)
    }

    async fn selected_images(&self) -> Result<Vec<ImageDescriptor>> {
        self.handoff().selected_images().await
    }

    async fn keep_selection(&self, images: &[ImageDescriptor]) -> Result<()> {
        self.handoff().set_selected_images(images, tasks::now_ms()).await
    }

    async fn save_complete(&self) -> Result<()> {
        self.handoff().save_complete().await
    }
}

#[function_component(WebApp)]
pub fn web_app() -> Html {
    let state = use_reducer(AppState::default);
    let page_url = use_state(String::new);
    let host = WebHost;

    {
        let dispatch = state.dispatcher();
        use_effect_with((), move |_| {
            spawn_local(async move {
                tasks::restore(&host, &dispatch).await;
                // Page extraction needs the backend, unlike the extension
                if !host.client().health().await {
                    log::warn!("Backend health check failed");
                    dispatch.dispatch(Action::Notify(
                        BannerKind::Info,
                        "The image service is offline. Finding images by URL is unavailable.".to_string(),
                    ));
                }
            });
            || ()
        });
    }

    let on_url_input = {
        let page_url = page_url.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                page_url.set(input.value());
            }
        })
    };

    let on_extract = {
        let dispatch = state.dispatcher();
        let page_url = page_url.clone();
        Callback::from(move |_| {
            let target = page_url.trim().to_string();
            if target.is_empty() {
                dispatch.dispatch(Action::Failed(AppError::Validation(
                    "Please enter a page URL".to_string(),
                )));
                return;
            }

            let dispatch = dispatch.clone();
            dispatch.dispatch(Action::LoadingStarted);
            spawn_local(async move {
                let client = host.client();
                let extracted = client.extract_from_url(&target).await;
                tasks::show_extracted(&host.handoff(), &client, extracted, &dispatch).await;
            });
        })
    };

    let cb = board_callbacks(&state, &host);
    let (found, selected) = state.stats();
    let is_busy = state.loading;

    html! {
        <div class="viewer-container">
            <div class="header-row">
                <div>
                    <h1 class="viewer-title">{"Pin Saver"}</h1>
                    <p class="viewer-subtitle">{"Collect images from any page and save them to your boards"}</p>
                </div>
                if let Some(profile) = &state.profile {
                    <UserBar profile={profile.clone()} on_logout={cb.on_logout} />
                }
            </div>

            <BannerView banner={state.banner.clone()} on_dismiss={cb.on_dismiss} />

            if is_busy {
                <div class="loading-text-center">
                    <Spinner />
                    <p class="loading-text">{"Working..."}</p>
                </div>
            }

            {match state.view {
                View::SignIn => html! {
                    <SignInPanel on_login={cb.on_login} disabled={is_busy} />
                },
                View::Images => html! {
                    <div class="flex-column-gap">
                        <div class="flex-row-gap">
                            <input
                                type="url"
                                placeholder="https://example.com/article"
                                value={(*page_url).clone()}
                                oninput={on_url_input}
                                class="search-input"
                            />
                            <Button onclick={on_extract} disabled={is_busy} variant={ButtonVariant::Primary}>
                                {"Find images"}
                            </Button>
                        </div>

                        if !state.candidates.is_empty() {
                            <SelectionBar
                                found={found}
                                selected={selected}
                                on_select_all={cb.on_select_all}
                                on_clear={cb.on_clear}
                            />
                            <ImageGrid
                                images={state.candidates.clone()}
                                selection={state.selection.clone()}
                                on_toggle={cb.on_toggle}
                            />
                            <Button onclick={cb.on_next.reform(|_| ())} disabled={is_busy || selected == 0} variant={ButtonVariant::Primary}>
                                {format!("Save {} selected", selected)}
                            </Button>
                        } else if state.scanned && !is_busy {
                            <div class="empty-state">
                                <p>{"No images found on that page."}</p>
                                <p class="empty-state-hint">{"Only images larger than 100×100 are shown."}</p>
                            </div>
                        }
                    </div>
                },
                View::Boards => html! {
                    <BoardsPanel
                        boards={state.boards.clone()}
                        selected={selected}
                        show_form={state.show_create_form}
                        form={state.new_board.clone()}
                        disabled={is_busy}
                        on_back={cb.on_back}
                        on_save={cb.on_save}
                        on_form_change={cb.on_form_change}
                        on_toggle_form={cb.on_toggle_form}
                        on_create={cb.on_create}
                    />
                },
            }}
        </div>
    }
}
