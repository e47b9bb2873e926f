use crate::api::FetchTransport;
use crate::config::UPLOAD_INPUT_ID;
use crate::dom;
use crate::forms::{FormSpec, Rule, SuccessAction};
use crate::pipeline::{self, InFlight, SubmitState};
use chrono::Local;
use log::{debug, warn};
use yew::prelude::*;

/// State and submit handler for one form.
#[derive(Clone, PartialEq)]
pub struct FormSubmission {
    /// The single error shown under the form. A new failure replaces it.
    pub error: Option<String>,
    /// True from the click until the submission settles.
    pub busy: bool,
    /// Attach to the form's `onsubmit`.
    pub onsubmit: Callback<SubmitEvent>,
}

/// Custom hook wiring a form to the submission pipeline.
///
/// On submit the fields are read from the page (plus the selected files for
/// forms that require them), validated, and sent. `on_success` receives the
/// form's success action; failures land in `error`.
#[hook]
pub fn use_form_submission(
    spec: &'static FormSpec,
    on_success: Callback<SuccessAction>,
) -> FormSubmission {
    let error_handle = use_state(|| None::<String>);
    let state_handle = use_state(SubmitState::default);
    let in_flight = (*use_state(InFlight::default)).clone();

    let onsubmit = {
        let error_handle = error_handle.clone();
        let state_handle = state_handle.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(ticket) = in_flight.try_begin() else {
                debug!("{:?} submit ignored, one is already running", spec.kind);
                return;
            };
            let error_setter = error_handle.clone();
            let state_setter = state_handle.clone();
            let on_success = on_success.clone();

            wasm_bindgen_futures::spawn_local(async move {
                let _ticket = ticket;
                state_setter.set(SubmitState::Validating);
                let mut input = dom::extract(spec);
                if spec.rules.contains(&Rule::FilesSelected) {
                    match dom::read_upload_files(UPLOAD_INPUT_ID).await {
                        Ok(files) => input = input.with_files(files),
                        Err(message) => {
                            warn!("{}", message);
                            error_setter.set(Some(message));
                            state_setter.set(SubmitState::Idle);
                            return;
                        }
                    }
                }
                let csrf_token = dom::csrf_token(spec.kind);
                let today = Local::now().date_naive();

                let result = pipeline::submit(
                    spec,
                    &input,
                    &csrf_token,
                    today,
                    &FetchTransport,
                    |state| state_setter.set(state),
                )
                .await;

                match result {
                    Ok(action) => {
                        error_setter.set(None);
                        on_success.emit(action);
                    }
                    Err(err) => error_setter.set(Some(err.user_message())),
                }
            });
        })
    };

    FormSubmission {
        error: (*error_handle).clone(),
        busy: *state_handle != SubmitState::Idle,
        onsubmit,
    }
}
