//! Browser front end for the CAET portal.
//!
//! Forms (login, registration, password recovery, upload, profile) are
//! validated locally and submitted to the backend through one shared
//! pipeline; see [`pipeline::submit`]. The UI is a set of Yew function
//! components mounted by the `caet_portal` binary.

use serde::{Deserialize, Serialize};

pub mod api;
pub mod components;
pub mod config;
pub mod dom;
pub mod error;
pub mod forms;
pub mod hooks;
pub mod identity;
pub mod loaders;
pub mod pipeline;
pub mod preview;
pub mod validate;
pub mod view;

pub use api::{ApiRequest, ApiResponse, Transport};
pub use error::{SubmitError, TransportError, ValidationError};
pub use forms::{FormInput, FormSpec, SuccessAction};
pub use view::{Section, Tab, ViewState};

/// Every form (or form-like action) that submits an anti-forgery token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Login,
    Register,
    ForgotPassword,
    Upload,
    Profile,
    Logout,
}

impl FormKind {
    fn slug(self) -> &'static str {
        match self {
            FormKind::Login => "login",
            FormKind::Register => "register",
            FormKind::ForgotPassword => "forgot",
            FormKind::Upload => "upload",
            FormKind::Profile => "profile",
            FormKind::Logout => "logout",
        }
    }

    /// Id of the `<form>` element.
    pub fn form_id(self) -> String {
        format!("{}-form", self.slug())
    }

    /// Id of the hidden input holding this form's anti-forgery token.
    pub fn csrf_element_id(self) -> String {
        format!("{}{}", config::CSRF_ID_PREFIX, self.slug())
    }
}

/// A selected file ready to be sent as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

/// Client-side projection of the signed-in user. The server owns the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub dob: String,
}

/// An uploaded file as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub mime: String,
}

/// `image/*` MIME types get thumbnails.
pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csrf_ids_follow_host_page() {
        assert_eq!(FormKind::Login.csrf_element_id(), "csrf-token-login");
        assert_eq!(FormKind::ForgotPassword.csrf_element_id(), "csrf-token-forgot");
        assert_eq!(FormKind::Profile.form_id(), "profile-form");
    }

    #[test]
    fn image_mime_prefix() {
        assert!(is_image_mime("image/png"));
        assert!(!is_image_mime("application/octet-stream"));
        assert!(!is_image_mime("text/image"));
    }
}
