/// Reusable UI components

use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::config::BANNER_TIMEOUT_MS;
use crate::image_data::{Board, ImageDescriptor, NewBoard, UserProfile};
use crate::selection::SelectionSet;
use crate::ui::state::{Banner, BannerKind};

pub const DEMO_TOKEN: &str = "demo_access_token_12345";

#[derive(Properties, PartialEq)]
pub struct BannerViewProps {
    pub banner: Option<Banner>,
    pub on_dismiss: Callback<u32>,
}

/// Shows the current banner and dismisses it after five seconds
#[function_component(BannerView)]
pub fn banner_view(props: &BannerViewProps) -> Html {
    let banner_id = props.banner.as_ref().map(|b| b.id);

    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(banner_id, move |id| {
            let timer = id.and_then(|id| {
                let closure = Closure::<dyn Fn()>::new(move || on_dismiss.emit(id));
                let handle = web_sys::window()?
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        closure.as_ref().unchecked_ref(),
                        BANNER_TIMEOUT_MS,
                    )
                    .ok()?;
                Some((handle, closure))
            });

            move || {
                if let (Some((handle, _closure)), Some(window)) = (timer, web_sys::window()) {
                    window.clear_timeout_with_handle(handle);
                }
            }
        });
    }

    match &props.banner {
        Some(banner) => {
            let (alert_type, title) = match banner.kind {
                BannerKind::Success => (AlertType::Success, "Done"),
                BannerKind::Error => (AlertType::Danger, "Error"),
                BannerKind::Info => (AlertType::Info, "Info"),
            };
            html! {
                <div class="message-top-margin">
                    <Alert r#type={alert_type} title={title} inline={true}>
                        {banner.message.clone()}
                    </Alert>
                </div>
            }
        }
        None => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct ImageGridProps {
    pub images: Vec<ImageDescriptor>,
    pub selection: SelectionSet,
    pub on_toggle: Callback<String>,
}

#[function_component(ImageGrid)]
pub fn image_grid(props: &ImageGridProps) -> Html {
    html! {
        <div class="images-grid">
            {for props.images.iter().map(|image| {
                let selected = props.selection.contains(&image.url);
                let url = image.url.clone();
                let class = if selected { "image-item selected" } else { "image-item" };

                html! {
                    <div
                        key={image.url.clone()}
                        class={class}
                        title={image.title.clone()}
                        onclick={props.on_toggle.reform(move |_: MouseEvent| url.clone())}
                    >
                        <img src={image.url.clone()} alt={image.title.clone()} loading="lazy" />
                        if selected {
                            <div class="selection-indicator">{"✓"}</div>
                        }
                        <div class="image-size">{format!("{}×{}", image.width, image.height)}</div>
                    </div>
                }
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct BoardListProps {
    pub boards: Vec<Board>,
    #[prop_or(false)]
    pub disabled: bool,
    pub on_save: Callback<String>,
}

#[function_component(BoardList)]
pub fn board_list(props: &BoardListProps) -> Html {
    if props.boards.is_empty() {
        return html! {
            <div class="empty-state">
                <p>{"No boards yet."}</p>
                <p class="empty-state-hint">{"Create a board to save your images."}</p>
            </div>
        };
    }

    html! {
        <div class="boards-list">
            {for props.boards.iter().map(|board| {
                let board_id = board.id.clone();
                let description = if board.description.is_empty() {
                    "No description".to_string()
                } else {
                    board.description.clone()
                };

                html! {
                    <div key={board.id.clone()} class="board-item">
                        <div class="board-info">
                            <h4>
                                if board.is_private { {"🔒 "} }
                                {&board.name}
                            </h4>
                            <p>{description}</p>
                            <p class="board-count">{format!("{} pins", board.image_count)}</p>
                        </div>
                        <Button
                            onclick={props.on_save.reform(move |_| board_id.clone())}
                            disabled={props.disabled}
                            variant={ButtonVariant::Primary}
                        >
                            {"Save"}
                        </Button>
                    </div>
                }
            })}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct CreateBoardFormProps {
    pub form: NewBoard,
    #[prop_or(false)]
    pub disabled: bool,
    pub on_change: Callback<NewBoard>,
    pub on_submit: Callback<()>,
    pub on_cancel: Callback<()>,
}

#[function_component(CreateBoardForm)]
pub fn create_board_form(props: &CreateBoardFormProps) -> Html {
    let on_name = {
        let form = props.form.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_change.emit(NewBoard { name: input.value(), ..form.clone() });
            }
        })
    };

    let on_description = {
        let form = props.form.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlTextAreaElement>() {
                on_change.emit(NewBoard { description: input.value(), ..form.clone() });
            }
        })
    };

    let on_private = {
        let form = props.form.clone();
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                on_change.emit(NewBoard { is_private: input.checked(), ..form.clone() });
            }
        })
    };

    html! {
        <div class="create-board-form">
            <input
                type="text"
                placeholder="Board name"
                value={props.form.name.clone()}
                oninput={on_name}
                class="search-input"
            />
            <textarea
                placeholder="Description (optional)"
                value={props.form.description.clone()}
                oninput={on_description}
                class="search-input"
            />
            <label class="checkbox-label">
                <input type="checkbox" checked={props.form.is_private} onchange={on_private} />
                {" Keep this board secret"}
            </label>
            <div class="flex-row-gap">
                <Button
                    onclick={props.on_submit.reform(|_| ())}
                    disabled={props.disabled}
                    variant={ButtonVariant::Primary}
                >
                    {"Create"}
                </Button>
                <Button onclick={props.on_cancel.reform(|_| ())} variant={ButtonVariant::Secondary}>
                    {"Cancel"}
                </Button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SignInPanelProps {
    pub on_login: Callback<String>,
    #[prop_or(false)]
    pub disabled: bool,
}

/// Token entry; an empty token signs in with the demo account
#[function_component(SignInPanel)]
pub fn sign_in_panel(props: &SignInPanelProps) -> Html {
    let token = use_state(String::new);

    let on_input = {
        let token = token.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                token.set(input.value());
            }
        })
    };

    let on_submit = {
        let token = token.clone();
        let on_login = props.on_login.clone();
        Callback::from(move |_| {
            let value = token.trim().to_string();
            on_login.emit(if value.is_empty() { DEMO_TOKEN.to_string() } else { value });
        })
    };

    let on_demo = props.on_login.reform(|_: MouseEvent| DEMO_TOKEN.to_string());

    html! {
        <div class="flex-column-gap">
            <p class="message-text">{"Sign in to save images to your boards."}</p>
            <input
                type="password"
                placeholder="Access token"
                value={(*token).clone()}
                oninput={on_input}
                class="search-input"
            />
            <Button onclick={on_submit} disabled={props.disabled} variant={ButtonVariant::Primary} block={true}>
                {"Sign in"}
            </Button>
            <Button onclick={on_demo} disabled={props.disabled} variant={ButtonVariant::Secondary} block={true}>
                {"Try the demo"}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct UserBarProps {
    pub profile: UserProfile,
    pub on_logout: Callback<()>,
}

#[function_component(UserBar)]
pub fn user_bar(props: &UserBarProps) -> Html {
    html! {
        <div class="user-info">
            <img src={props.profile.avatar().to_string()} alt="Profile" class="profile-image" />
            <span>{&props.profile.username}</span>
            <Button onclick={props.on_logout.reform(|_| ())} variant={ButtonVariant::Link}>
                {"Logout"}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SelectionBarProps {
    pub found: usize,
    pub selected: usize,
    pub on_select_all: Callback<()>,
    pub on_clear: Callback<()>,
}

#[function_component(SelectionBar)]
pub fn selection_bar(props: &SelectionBarProps) -> Html {
    html! {
        <div class="selection-bar">
            <span class="stat-item">{format!("{} found", props.found)}</span>
            <span class="stat-item">{format!("{} selected", props.selected)}</span>
            <Button onclick={props.on_select_all.reform(|_| ())} variant={ButtonVariant::Secondary}>
                {"Select All"}
            </Button>
            <Button onclick={props.on_clear.reform(|_| ())} variant={ButtonVariant::Secondary}>
                {"Clear"}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct BoardsPanelProps {
    pub boards: Vec<Board>,
    pub selected: usize,
    pub show_form: bool,
    pub form: NewBoard,
    #[prop_or(false)]
    pub disabled: bool,
    pub on_back: Callback<()>,
    pub on_save: Callback<String>,
    pub on_form_change: Callback<NewBoard>,
    pub on_toggle_form: Callback<()>,
    pub on_create: Callback<()>,
}

/// Board picker with the inline create-board form
#[function_component(BoardsPanel)]
pub fn boards_panel(props: &BoardsPanelProps) -> Html {
    html! {
        <div class="flex-column-gap">
            <div class="flex-row-gap">
                <Button onclick={props.on_back.reform(|_| ())} variant={ButtonVariant::Link}>
                    {"← Back"}
                </Button>
                <span class="message-text">{format!("Saving {} images", props.selected)}</span>
            </div>

            if props.show_form {
                <CreateBoardForm
                    form={props.form.clone()}
                    disabled={props.disabled}
                    on_change={props.on_form_change.clone()}
                    on_submit={props.on_create.clone()}
                    on_cancel={props.on_toggle_form.clone()}
                />
            } else {
                <Button onclick={props.on_toggle_form.reform(|_| ())} variant={ButtonVariant::Secondary} block={true}>
                    {"+ Create new board"}
                </Button>
            }

            <BoardList boards={props.boards.clone()} disabled={props.disabled} on_save={props.on_save.clone()} />
        </div>
    }
}
