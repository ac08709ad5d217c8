/// Popup UI for the Pin Saver extension

use yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use patternfly_yew::prelude::*;

use crate::error::Result;
use crate::image_data::ImageDescriptor;
use crate::storage::{ChromeStorage, HandoffStore};
use crate::transport::{self, RuntimeChannel, TabChannel};
use crate::ui::callbacks::board_callbacks;
use crate::ui::components::{BannerView, BoardsPanel, ImageGrid, SelectionBar, SignInPanel, UserBar};
use crate::ui::state::{Action, AppState, View};
use crate::ui::tasks::{self, Host};

/// Session in `chrome.storage`; the selection handoff goes through the background
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtensionHost;

impl Host for ExtensionHost {
    type Store = ChromeStorage;

    fn handoff(&self) -> HandoffStore<ChromeStorage> {
        HandoffStore::new(ChromeStorage)
    }

    async fn selected_images(&self) -> Result<Vec<ImageDescriptor>> {
        transport::get_selected_images(&RuntimeChannel).await
    }

    async fn keep_selection(&self, images: &[ImageDescriptor]) -> Result<()> {
        transport::set_selected_images(&RuntimeChannel, images).await
    }

    async fn save_complete(&self) -> Result<()> {
        transport::save_complete(&RuntimeChannel).await
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(AppState::default);
    let host = ExtensionHost;

    // Pick up the session and whatever the page or a context menu handed over
    {
        let dispatch = state.dispatcher();
        use_effect_with((), move |_| {
            spawn_local(async move {
                tasks::restore(&host, &dispatch).await;
            });
            || ()
        });
    }

    // Scan the active tab through its content script
    let on_extract = {
        let dispatch = state.dispatcher();
        Callback::from(move |_| {
            let dispatch = dispatch.clone();
            dispatch.dispatch(Action::LoadingStarted);
            spawn_local(async move {
                let extracted = match TabChannel::active().await {
                    Ok(tab) => transport::extract_images(&tab).await,
                    Err(e) => Err(e),
                };
                tasks::show_extracted(&host.handoff(), &host.client(), extracted, &dispatch).await;
            });
        })
    };

    let cb = board_callbacks(&state, &host);
    let (found, selected) = state.stats();
    let is_busy = state.loading;

    html! {
        <div class="popup-container">
            <div class="header-row">
                <h1 class="popup-title">{"Pin Saver"}</h1>
                if let Some(profile) = &state.profile {
                    <UserBar profile={profile.clone()} on_logout={cb.on_logout} />
                }
            </div>

            <BannerView banner={state.banner.clone()} on_dismiss={cb.on_dismiss} />

            if is_busy {
                <div class="loading-text-center">
                    <Spinner />
                </div>
            }

            <div class="tab-pane-content">
                {match state.view {
                    View::SignIn => html! {
                        <SignInPanel on_login={cb.on_login} disabled={is_busy} />
                    },
                    View::Images => html! {
                        <div class="flex-column-gap">
                            <Button onclick={on_extract} disabled={is_busy} variant={ButtonVariant::Secondary} block={true}>
                                {"Extract images from this page"}
                            </Button>

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
                                <Button
                                    onclick={cb.on_next.reform(|_| ())}
                                    disabled={is_busy || selected == 0}
                                    variant={ButtonVariant::Primary}
                                    block={true}
                                >
                                    {format!("Save {} selected", selected)}
                                </Button>
                            } else if state.scanned && !is_busy {
                                <div class="empty-state">
                                    <p>{"No images found on this page."}</p>
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

            <p class="footer-popup">
                {"Pin Saver v0.1.0"}
            </p>
        </div>
    }
}
