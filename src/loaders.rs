//! Fetch-and-render routines for the dashboard's profile and file list.

use crate::api::{ApiRequest, Transport};
use crate::config::{FILES_ENDPOINT, PROFILE_ENDPOINT, UPLOADS_PREFIX};
use crate::error::{SubmitError, TransportError};
use crate::pipeline::interpret;
use crate::{is_image_mime, FileRecord, UserProfile};
use log::{info, warn};

/// One card in the uploaded-files grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCard {
    pub name: String,
    /// Inline thumbnail source, images only.
    pub thumbnail: Option<String>,
    pub download_href: String,
}

impl From<&FileRecord> for FileCard {
    fn from(record: &FileRecord) -> Self {
        let href = format!("{}{}", UPLOADS_PREFIX, record.name);
        Self {
            name: record.name.clone(),
            thumbnail: is_image_mime(&record.mime).then(|| href.clone()),
            download_href: href,
        }
    }
}

/// What the file list area shows after a load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileListing {
    /// Before the first load completes.
    #[default]
    Loading,
    /// Rendered as the "no files" placeholder.
    Empty,
    Cards(Vec<FileCard>),
}

impl FileListing {
    pub fn from_records(records: &[FileRecord]) -> Self {
        if records.is_empty() {
            FileListing::Empty
        } else {
            FileListing::Cards(records.iter().map(FileCard::from).collect())
        }
    }
}

/// `GET /profile`. The result is a projection valid until the next load.
pub async fn load_user_profile<T: Transport>(transport: &T) -> Result<UserProfile, SubmitError> {
    let response = transport.send(ApiRequest::get(PROFILE_ENDPOINT)).await?;
    let response = interpret(response, "Unknown error.")?;
    let profile = response
        .user
        .ok_or_else(|| TransportError::Decode("profile response without user".into()))?;
    info!("Loaded profile for {}", profile.email);
    Ok(profile)
}

/// `GET /files`.
///
/// A server-side refusal renders as the empty placeholder. A transport
/// failure, or a success envelope without a `files` list, is an error.
pub async fn load_user_files<T: Transport>(transport: &T) -> Result<FileListing, SubmitError> {
    let response = transport.send(ApiRequest::get(FILES_ENDPOINT)).await?;
    if !response.success {
        warn!(
            "File listing refused: {}",
            response.message.as_deref().unwrap_or("no message")
        );
        return Ok(FileListing::Empty);
    }
    let records = response
        .files
        .ok_or_else(|| TransportError::Decode("file listing without files".into()))?;
    info!("Loaded {} uploaded files", records.len());
    Ok(FileListing::from_records(&records))
}

/// Alert text for a failed profile load.
pub fn profile_load_message(err: &SubmitError) -> String {
    match err {
        SubmitError::Server(message) => format!("Error loading profile: {}", message),
        other => other.user_message(),
    }
}
