//! Thin helpers over the host page: field values, anti-forgery tokens,
//! alerts, navigation and selected files.

use crate::forms::{FormInput, FormSpec};
use crate::preview::SelectedFile;
use crate::{FormKind, UploadFile};
use gloo_utils::{document, window};
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlFormElement, HtmlInputElement};

fn input_by_id(id: &str) -> Option<HtmlInputElement> {
    document()
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
}

/// Current value of an input, or empty when the page lacks it.
pub fn read_value(id: &str) -> String {
    match input_by_id(id) {
        Some(input) => input.value(),
        None => {
            warn!("Input #{} not found", id);
            String::new()
        }
    }
}

/// Read and clean every field of `spec`.
pub fn extract(spec: &FormSpec) -> FormInput {
    FormInput::extract(spec.fields, read_value)
}

/// The form's anti-forgery token from its hidden input.
pub fn csrf_token(kind: FormKind) -> String {
    read_value(&kind.csrf_element_id())
}

pub fn alert(message: &str) {
    if let Err(e) = window().alert_with_message(message) {
        warn!("alert failed: {:?}", e);
    }
}

pub fn redirect(path: &str) {
    debug!("Redirecting to {}", path);
    if let Err(e) = window().location().set_href(path) {
        warn!("redirect to {} failed: {:?}", path, e);
    }
}

pub fn current_path() -> String {
    window().location().pathname().unwrap_or_default()
}

pub fn reset_form(kind: FormKind) {
    let form = document()
        .get_element_by_id(&kind.form_id())
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok());
    match form {
        Some(form) => form.reset(),
        None => warn!("Form #{} not found", kind.form_id()),
    }
}

/// Files currently chosen in a file input.
pub fn selected_files(input: &HtmlInputElement) -> Vec<SelectedFile<gloo_file::File>> {
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|raw| {
            let file = gloo_file::File::from(raw);
            SelectedFile {
                name: file.name(),
                mime: file.raw_mime_type(),
                handle: file,
            }
        })
        .collect()
}

/// Read the bytes of every file selected in the input with id `id`.
pub async fn read_upload_files(id: &str) -> Result<Vec<UploadFile>, String> {
    let Some(input) = input_by_id(id) else {
        warn!("File input #{} not found", id);
        return Ok(Vec::new());
    };
    let mut files = Vec::new();
    for selected in selected_files(&input) {
        let bytes = gloo_file::futures::read_as_bytes(&selected.handle)
            .await
            .map_err(|e| format!("Could not read {}: {}", selected.name, e))?;
        files.push(UploadFile::new(selected.name, selected.mime, bytes));
    }
    Ok(files)
}

/// Data URL of a file, for inline thumbnails.
pub async fn read_data_url(file: gloo_file::File) -> Result<String, String> {
    gloo_file::futures::read_as_data_url(&file)
        .await
        .map_err(|e| e.to_string())
}
