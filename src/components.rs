//! Yew view components for the portal's forms, previews and file list.
//!
//! Presentational pieces (`ErrorNotice`, `FileList`, `PreviewArea`) render
//! purely from props. Form components own their submission state through
//! [`use_form_submission`]. Anti-forgery tokens live in hidden inputs on the
//! host page, outside these forms.

use crate::config::{
    GOOGLE_LOGIN_BUTTON_ID, GOOGLE_REGISTER_BUTTON_ID, MSG_DOWNLOAD, MSG_NO_FILES, UPLOAD_INPUT_ID,
};
use crate::dom;
use crate::forms::{self, SuccessAction};
use crate::hooks::use_form_submission;
use crate::loaders::{FileCard, FileListing};
use crate::preview::{read_previews, PreviewAction, PreviewItem, PreviewState};
use crate::view::Tab;
use crate::{FormKind, UserProfile};
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Carry out a success action: alert, then redirect/reset as the form asks.
pub fn perform_success(
    kind: FormKind,
    action: &SuccessAction,
    on_show_tab: &Callback<Tab>,
    on_files_changed: &Callback<()>,
) {
    dom::alert(action.notice());
    match action {
        SuccessAction::Redirect { target, .. } => dom::redirect(target),
        SuccessAction::ResetAndShowTab { tab, .. } => {
            dom::reset_form(kind);
            on_show_tab.emit(*tab);
        }
        SuccessAction::Notify { .. } => {}
        SuccessAction::ResetAndRefreshFiles { .. } => {
            dom::reset_form(kind);
            on_files_changed.emit(());
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorNoticeProps {
    pub message: Option<String>,
}

/// The one inline error slot of a form.
#[function_component(ErrorNotice)]
pub fn error_notice(props: &ErrorNoticeProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <div class="error" style="color: red; margin-top: 0.5rem;">{ message.clone() }</div>
        },
        None => html! {},
    }
}

#[derive(Properties, PartialEq)]
pub struct FileListProps {
    pub listing: FileListing,
}

fn render_file_card(card: &FileCard) -> Html {
    html! {
        <div class="file-card">
            if let Some(src) = &card.thumbnail {
                <img src={src.clone()} alt={card.name.clone()} />
            }
            <p>{ card.name.clone() }</p>
            <a href={card.download_href.clone()} download={card.name.clone()}>{ MSG_DOWNLOAD }</a>
        </div>
    }
}

#[function_component(FileList)]
pub fn file_list(props: &FileListProps) -> Html {
    html! {
        <div id="file-list">
            { match &props.listing {
                FileListing::Loading => html! {},
                FileListing::Empty => html! { <p>{ MSG_NO_FILES }</p> },
                FileListing::Cards(cards) => cards.iter().map(render_file_card).collect::<Html>(),
            } }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PreviewAreaProps {
    pub items: Vec<PreviewItem>,
}

#[function_component(PreviewArea)]
pub fn preview_area(props: &PreviewAreaProps) -> Html {
    html! {
        <div id="preview">
            { props.items.iter().map(|item| match item {
                PreviewItem::Thumbnail { name, data_url } => html! {
                    <img class="preview-img" src={data_url.clone()} alt={name.clone()} />
                },
                PreviewItem::FileName(name) => html! { <p>{ format!("File: {}", name) }</p> },
                PreviewItem::Unreadable { name, .. } => html! {
                    <p class="preview-error">{ format!("Could not read {}", name) }</p>
                },
            }).collect::<Html>() }
        </div>
    }
}

#[function_component(LoginForm)]
pub fn login_form() -> Html {
    let on_success = Callback::from(|action: SuccessAction| {
        perform_success(
            FormKind::Login,
            &action,
            &Callback::noop(),
            &Callback::noop(),
        )
    });
    let submission = use_form_submission(&forms::LOGIN, on_success);

    html! {
        <form id={FormKind::Login.form_id()} onsubmit={submission.onsubmit.clone()} novalidate=true>
            <label for="login-email">{ "Email" }</label>
            <input type="email" id="login-email" autocomplete="email" />
            <label for="login-password">{ "Password" }</label>
            <input type="password" id="login-password" autocomplete="current-password" />
            <button type="submit" class="btn" disabled={submission.busy}>{ "Log in" }</button>
            <div id={GOOGLE_LOGIN_BUTTON_ID}></div>
            <ErrorNotice message={submission.error.clone()} />
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct RegisterFormProps {
    pub on_show_tab: Callback<Tab>,
}

#[function_component(RegisterForm)]
pub fn register_form(props: &RegisterFormProps) -> Html {
    let on_success = {
        let on_show_tab = props.on_show_tab.clone();
        Callback::from(move |action: SuccessAction| {
            perform_success(FormKind::Register, &action, &on_show_tab, &Callback::noop())
        })
    };
    let submission = use_form_submission(&forms::REGISTER, on_success);

    html! {
        <form id={FormKind::Register.form_id()} onsubmit={submission.onsubmit.clone()} novalidate=true>
            <label for="register-name">{ "Name" }</label>
            <input type="text" id="register-name" autocomplete="name" />
            <label for="register-email">{ "Email" }</label>
            <input type="email" id="register-email" autocomplete="email" />
            <label for="register-password">{ "Password" }</label>
            <input type="password" id="register-password" autocomplete="new-password" />
            <label for="register-confirm-password">{ "Confirm password" }</label>
            <input type="password" id="register-confirm-password" autocomplete="new-password" />
            <label for="register-dob">{ "Date of birth" }</label>
            <input type="date" id="register-dob" />
            <label for="register-phone">{ "Phone" }</label>
            <input type="tel" id="register-phone" autocomplete="tel" />
            <button type="submit" class="btn" disabled={submission.busy}>{ "Create account" }</button>
            <div id={GOOGLE_REGISTER_BUTTON_ID}></div>
            <ErrorNotice message={submission.error.clone()} />
        </form>
    }
}

#[function_component(ForgotPasswordForm)]
pub fn forgot_password_form() -> Html {
    let on_success = Callback::from(|action: SuccessAction| {
        perform_success(
            FormKind::ForgotPassword,
            &action,
            &Callback::noop(),
            &Callback::noop(),
        )
    });
    let submission = use_form_submission(&forms::FORGOT_PASSWORD, on_success);

    html! {
        <form id={FormKind::ForgotPassword.form_id()} onsubmit={submission.onsubmit.clone()} novalidate=true>
            <label for="forgot-email">{ "Email" }</label>
            <input type="email" id="forgot-email" autocomplete="email" />
            <button type="submit" class="btn" disabled={submission.busy}>{ "Send recovery email" }</button>
            <ErrorNotice message={submission.error.clone()} />
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct UploadFormProps {
    /// Fired after a successful upload; the dashboard reloads its list.
    #[prop_or_default]
    pub on_uploaded: Callback<()>,
}

#[function_component(UploadForm)]
pub fn upload_form(props: &UploadFormProps) -> Html {
    let preview = use_reducer(PreviewState::default);
    // Bumped per selection so late reads from an older one are dropped.
    let generation = use_mut_ref(|| 0u64);

    let on_success = {
        let on_uploaded = props.on_uploaded.clone();
        let preview = preview.dispatcher();
        let generation = generation.clone();
        Callback::from(move |action: SuccessAction| {
            let cleared = {
                let mut current = generation.borrow_mut();
                *current += 1;
                *current
            };
            preview.dispatch(PreviewAction::Reset(cleared));
            perform_success(FormKind::Upload, &action, &Callback::noop(), &on_uploaded)
        })
    };
    let submission = use_form_submission(&forms::UPLOAD, on_success);

    let onchange = {
        let preview = preview.dispatcher();
        let generation = generation.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let current = {
                let mut current = generation.borrow_mut();
                *current += 1;
                *current
            };
            preview.dispatch(PreviewAction::Reset(current));

            let files = dom::selected_files(&input);
            let preview = preview.clone();
            wasm_bindgen_futures::spawn_local(async move {
                read_previews(files, dom::read_data_url, |item| {
                    preview.dispatch(PreviewAction::Append(current, item))
                })
                .await;
            });
        })
    };

    html! {
        <form id={FormKind::Upload.form_id()} onsubmit={submission.onsubmit.clone()}>
            <label for={UPLOAD_INPUT_ID}>{ "Files" }</label>
            <input type="file" id={UPLOAD_INPUT_ID} multiple=true {onchange} />
            <PreviewArea items={preview.items.clone()} />
            <button type="submit" class="btn" disabled={submission.busy}>{ "Upload" }</button>
            <ErrorNotice message={submission.error.clone()} />
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProfileFormProps {
    /// Last loaded projection; `None` until the first load completes.
    pub profile: Option<UserProfile>,
}

#[function_component(ProfileForm)]
pub fn profile_form(props: &ProfileFormProps) -> Html {
    let on_success = Callback::from(|action: SuccessAction| {
        perform_success(
            FormKind::Profile,
            &action,
            &Callback::noop(),
            &Callback::noop(),
        )
    });
    let submission = use_form_submission(&forms::PROFILE, on_success);
    let profile = props.profile.clone().unwrap_or_default();

    html! {
        <form id={FormKind::Profile.form_id()} onsubmit={submission.onsubmit.clone()} novalidate=true>
            <label for="profile-name">{ "Name" }</label>
            <input type="text" id="profile-name" value={profile.name} />
            <label for="profile-email">{ "Email" }</label>
            <input type="email" id="profile-email" value={profile.email} readonly=true />
            <label for="profile-phone">{ "Phone" }</label>
            <input type="tel" id="profile-phone" value={profile.phone} />
            <label for="profile-dob">{ "Date of birth" }</label>
            <input type="date" id="profile-dob" value={profile.dob} />
            <button type="submit" class="btn" disabled={submission.busy}>{ "Save" }</button>
            <ErrorNotice message={submission.error.clone()} />
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::RecordingTransport;
    use crate::api::ApiResponse;
    use crate::forms::FormInput;
    use crate::pipeline;
    use crate::FileRecord;
    use chrono::NaiveDate;
    use yew::LocalServerRenderer;

    async fn render_files(listing: FileListing) -> String {
        LocalServerRenderer::<FileList>::with_props(FileListProps { listing })
            .hydratable(false)
            .render()
            .await
    }

    #[tokio::test]
    async fn empty_listing_renders_only_placeholder() {
        let html = render_files(FileListing::Empty).await;
        assert_eq!(html.matches(MSG_NO_FILES).count(), 1);
        assert!(!html.contains("file-card"));
    }

    #[tokio::test]
    async fn cards_render_thumbnail_for_images_only() {
        let records = vec![
            FileRecord {
                name: "cat.jpg".into(),
                mime: "image/jpeg".into(),
            },
            FileRecord {
                name: "doc.bin".into(),
                mime: "application/octet-stream".into(),
            },
        ];
        let html = render_files(FileListing::from_records(&records)).await;
        assert_eq!(html.matches("class=\"file-card\"").count(), 2);
        assert_eq!(html.matches("<img").count(), 1);
        assert!(html.contains("href=\"/uploads/doc.bin\""));
        assert!(!html.contains(MSG_NO_FILES));
    }

    #[tokio::test]
    async fn error_notice_renders_at_most_one_node() {
        for message in [None, Some("first".to_string()), Some("second".to_string())] {
            let expected = usize::from(message.is_some());
            let html = LocalServerRenderer::<ErrorNotice>::with_props(ErrorNoticeProps { message })
                .hydratable(false)
                .render()
                .await;
            assert_eq!(html.matches("class=\"error\"").count(), expected);
        }
    }

    #[tokio::test]
    async fn repeated_failures_leave_only_the_latest_error() {
        let transport = RecordingTransport::default();
        transport.push(Ok(ApiResponse::failed("Invalid credentials")));
        transport.push(Ok(ApiResponse::failed("Account locked")));
        let form = FormInput::extract(forms::LOGIN.fields, |id| match id {
            "login-email" => "ana@example.com".to_string(),
            _ => "hunter2".to_string(),
        });
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let mut slot: Option<String> = None;
        for _ in 0..2 {
            let err = pipeline::submit(&forms::LOGIN, &form, "tok", today, &transport, |_| {})
                .await
                .unwrap_err();
            slot = Some(err.user_message());
        }

        let props = ErrorNoticeProps { message: slot };
        let html = LocalServerRenderer::<ErrorNotice>::with_props(props)
            .hydratable(false)
            .render()
            .await;
        assert_eq!(transport.sent().len(), 2);
        assert_eq!(html.matches("class=\"error\"").count(), 1);
        assert!(html.contains("Account locked"));
        assert!(!html.contains("Invalid credentials"));
    }

    #[tokio::test]
    async fn preview_lines_and_thumbnails() {
        let items = vec![
            PreviewItem::FileName("notes.txt".into()),
            PreviewItem::Thumbnail {
                name: "a.png".into(),
                data_url: "data:image/png;base64,AA==".into(),
            },
        ];
        let html = LocalServerRenderer::<PreviewArea>::with_props(PreviewAreaProps { items })
            .hydratable(false)
            .render()
            .await;
        assert!(html.contains("File: notes.txt"));
        assert_eq!(html.matches("preview-img").count(), 1);
    }
}
