use crate::config::MSG_CONNECTION_FAILED;
use thiserror::Error;

/// Which local check rejected a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    MissingField,
    InvalidEmail,
    PasswordTooShort,
    PasswordMismatch,
    InvalidDate,
    Underage,
    InvalidPhone,
    NoFilesSelected,
}

/// A local validation failure. Never reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: ValidationKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ValidationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The request never produced a usable response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to build request: {0}")]
    Request(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Terminal outcome of a failed submission or load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The server answered with `success: false`.
    #[error("{0}")]
    Server(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl SubmitError {
    /// Text shown to the user for this failure.
    ///
    /// Transport details are logged, not displayed.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Invalid(e) => e.message.clone(),
            SubmitError::Server(message) => message.clone(),
            SubmitError::Transport(_) => MSG_CONNECTION_FAILED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_hide_details_from_users() {
        let err = SubmitError::from(TransportError::Decode("expected value".into()));
        assert_eq!(err.user_message(), MSG_CONNECTION_FAILED);
        assert!(err.to_string().contains("expected value"));
    }

    #[test]
    fn validation_message_passes_through() {
        let err = SubmitError::from(ValidationError::new(
            ValidationKind::InvalidEmail,
            "Please enter a valid email.",
        ));
        assert_eq!(err.user_message(), "Please enter a valid email.");
    }
}
