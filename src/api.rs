//! Request descriptors, the backend's JSON envelope, and the transport seam.

use crate::error::TransportError;
use crate::{FileRecord, UploadFile, UserProfile};
use serde::{Deserialize, Serialize};
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// One `files` part per upload plus the anti-forgery token.
    Multipart {
        files: Vec<UploadFile>,
        csrf_token: String,
    },
}

/// A single request to the backend, independent of how it is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: &'static str,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn get(path: &'static str) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            body: RequestBody::Empty,
        }
    }

    pub fn post_json(path: &'static str, body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            body: RequestBody::Json(body),
        }
    }

    pub fn post_multipart(path: &'static str, files: Vec<UploadFile>, csrf_token: String) -> Self {
        Self {
            method: HttpMethod::Post,
            path,
            body: RequestBody::Multipart { files, csrf_token },
        }
    }
}

/// Envelope shared by every endpoint: `{success, message?, ...}`.
///
/// Parsed regardless of HTTP status; the backend reports failures with a
/// 4xx/5xx status *and* `success: false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub files: Option<Vec<FileRecord>>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Async seam between the handlers and the network.
pub trait Transport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, TransportError>>;
}

pub use fetch::FetchTransport;

mod fetch {
    use super::*;
    use crate::config::{CSRF_FIELD, UPLOAD_FILES_FIELD};
    use gloo_net::http::{Request, RequestBuilder};
    use log::debug;
    use wasm_bindgen::JsValue;

    /// Browser `fetch` via gloo-net. Session cookies ride along by default.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FetchTransport;

    fn js_error(value: JsValue) -> TransportError {
        TransportError::Request(format!("{:?}", value))
    }

    fn multipart(
        files: &[UploadFile],
        csrf_token: &str,
    ) -> Result<web_sys::FormData, TransportError> {
        let form = web_sys::FormData::new().map_err(js_error)?;
        for file in files {
            let blob =
                gloo_file::Blob::new_with_options(file.bytes.as_slice(), Some(file.mime.as_str()));
            let raw: web_sys::Blob = blob.into();
            form.append_with_blob_and_filename(UPLOAD_FILES_FIELD, &raw, &file.name)
                .map_err(js_error)?;
        }
        form.append_with_str(CSRF_FIELD, csrf_token).map_err(js_error)?;
        Ok(form)
    }

    impl Transport for FetchTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            debug!("{:?} {}", request.method, request.path);
            let builder: RequestBuilder = match request.method {
                HttpMethod::Get => Request::get(request.path),
                HttpMethod::Post => Request::post(request.path),
            };

            let response = match &request.body {
                RequestBody::Empty => builder
                    .header("Content-Type", "application/json")
                    .send()
                    .await,
                RequestBody::Json(body) => builder
                    .json(body)
                    .map_err(|e| TransportError::Request(e.to_string()))?
                    .send()
                    .await,
                RequestBody::Multipart { files, csrf_token } => builder
                    .body(multipart(files, csrf_token)?)
                    .map_err(|e| TransportError::Request(e.to_string()))?
                    .send()
                    .await,
            }
            .map_err(|e| TransportError::Network(e.to_string()))?;

            debug!("{} answered {}", request.path, response.status());
            response
                .json::<ApiResponse>()
                .await
                .map_err(|e| TransportError::Decode(e.to_string()))
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Records every request and replays queued responses in order.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub requests: RefCell<Vec<ApiRequest>>,
        responses: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
    }

    impl RecordingTransport {
        pub fn replying(response: Result<ApiResponse, TransportError>) -> Self {
            let transport = Self::default();
            transport.push(response);
            transport
        }

        pub fn push(&self, response: Result<ApiResponse, TransportError>) {
            self.responses.borrow_mut().push_back(response);
        }

        pub fn sent(&self) -> Vec<ApiRequest> {
            self.requests.borrow().clone()
        }
    }

    impl Transport for RecordingTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("no response queued".into())))
        }
    }
}
