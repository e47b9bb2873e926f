//! The one submission path every form goes through:
//! validate → build request → send → interpret the envelope.

use crate::api::{ApiResponse, Transport};
use crate::error::{SubmitError, ValidationError};
use crate::forms::{FormInput, FormSpec, SuccessAction};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::cell::Cell;
use std::rc::Rc;

/// Lifecycle of a single submission.
///
/// `Idle → Validating → Invalid → Idle`, or
/// `Idle → Validating → Submitting → Succeeded|Failed → Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    Validating,
    Invalid,
    Submitting,
    Succeeded,
    Failed,
}

/// Per-form latch held from the click until the submission settles,
/// including any file reads before the request is built.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Rc<Cell<bool>>);

/// Releases its [`InFlight`] latch when dropped.
#[derive(Debug)]
pub struct InFlightTicket(Rc<Cell<bool>>);

impl InFlight {
    /// `None` while another submission of the same form is running.
    pub fn try_begin(&self) -> Option<InFlightTicket> {
        if self.0.replace(true) {
            None
        } else {
            Some(InFlightTicket(Rc::clone(&self.0)))
        }
    }

    pub fn is_active(&self) -> bool {
        self.0.get()
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Run the form's rules in order, stopping at the first failure.
pub fn validate(
    spec: &FormSpec,
    input: &FormInput,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    spec.rules
        .iter()
        .try_for_each(|rule| rule.check(input, today))
}

/// Turn a parsed envelope into success or a server-reported failure.
pub fn interpret(response: ApiResponse, fallback: &str) -> Result<ApiResponse, SubmitError> {
    if response.success {
        Ok(response)
    } else {
        let message = response
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        Err(SubmitError::Server(message))
    }
}

/// Submit `input` through `spec`, reporting each state transition.
///
/// Nothing is sent when validation fails. No retries.
pub async fn submit<T: Transport>(
    spec: &FormSpec,
    input: &FormInput,
    csrf_token: &str,
    today: NaiveDate,
    transport: &T,
    mut on_state: impl FnMut(SubmitState),
) -> Result<SuccessAction, SubmitError> {
    on_state(SubmitState::Validating);
    if let Err(e) = validate(spec, input, today) {
        debug!("{:?} rejected locally: {}", spec.kind, e);
        on_state(SubmitState::Invalid);
        on_state(SubmitState::Idle);
        return Err(e.into());
    }

    on_state(SubmitState::Submitting);
    let request = (spec.build_request)(input, csrf_token);
    let result = match transport.send(request).await {
        Ok(response) => {
            interpret(response, spec.failure_fallback).map(|_| (spec.on_success)(input))
        }
        Err(e) => {
            warn!("{:?} submission failed: {}", spec.kind, e);
            Err(e.into())
        }
    };

    match &result {
        Ok(_) => {
            info!("{:?} submission accepted", spec.kind);
            on_state(SubmitState::Succeeded);
        }
        Err(e) => {
            debug!("{:?} submission refused: {}", spec.kind, e);
            on_state(SubmitState::Failed);
        }
    }
    on_state(SubmitState::Idle);
    result
}
