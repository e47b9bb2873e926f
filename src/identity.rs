//! Google Identity Services interop and the session endpoints around it.
//!
//! The widget hands us an opaque credential; it is forwarded untouched and
//! the backend decides whether to trust it.

use crate::api::{ApiRequest, Transport};
use crate::config::*;
use crate::error::SubmitError;
use crate::pipeline::interpret;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = initialize)]
    fn gis_initialize(config: &JsValue);

    #[wasm_bindgen(js_namespace = ["google", "accounts", "id"], js_name = renderButton)]
    fn gis_render_button(parent: &web_sys::Element, options: &JsValue);
}

/// Argument of the widget's sign-in callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialResponse {
    #[serde(default)]
    pub credential: Option<String>,
}

#[derive(Serialize)]
struct ButtonOptions {
    theme: &'static str,
    size: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignIn {
    /// No credential in the callback; nothing was sent.
    Ignored,
    SignedIn,
}

/// Forward a widget credential to `/google-login`.
pub async fn sign_in_with_credential<T: Transport>(
    transport: &T,
    credential: Option<&str>,
) -> Result<SignIn, SubmitError> {
    let Some(token) = credential.filter(|t| !t.is_empty()) else {
        debug!("Sign-in callback without credential");
        return Ok(SignIn::Ignored);
    };
    let response = transport
        .send(ApiRequest::post_json(
            GOOGLE_LOGIN_ENDPOINT,
            json!({ "token": token }),
        ))
        .await?;
    interpret(response, "Unknown error.")?;
    info!("Google sign-in accepted");
    Ok(SignIn::SignedIn)
}

/// `POST /logout` with the dashboard's anti-forgery token.
pub async fn logout<T: Transport>(transport: &T, csrf_token: &str) -> Result<(), SubmitError> {
    let response = transport
        .send(ApiRequest::post_json(
            LOGOUT_ENDPOINT,
            json!({ "csrf_token": csrf_token }),
        ))
        .await?;
    interpret(response, "Unknown error.")?;
    info!("Logged out");
    Ok(())
}

/// Alert text for a failed bridge call. `prefix` names the action.
pub fn failure_message(prefix: &str, err: &SubmitError) -> String {
    match err {
        SubmitError::Server(message) => format!("{}: {}", prefix, message),
        other => other.user_message(),
    }
}

fn on_credential(response: JsValue) {
    let parsed: CredentialResponse = serde_wasm_bindgen::from_value(response).unwrap_or_else(|e| {
        warn!("Unexpected sign-in callback payload: {}", e);
        CredentialResponse::default()
    });
    wasm_bindgen_futures::spawn_local(async move {
        let transport = crate::api::FetchTransport;
        match sign_in_with_credential(&transport, parsed.credential.as_deref()).await {
            Ok(SignIn::Ignored) => {}
            Ok(SignIn::SignedIn) => {
                crate::dom::alert("Google sign-in successful!");
                crate::dom::redirect(DASHBOARD_PATH);
            }
            Err(e) => crate::dom::alert(&failure_message("Google sign-in failed", &e)),
        }
    });
}

/// Initialize the widget and render its buttons, if a client id was
/// configured and the page has the button slots.
pub fn init_google_sign_in() {
    let Some(client_id) = GOOGLE_CLIENT_ID else {
        info!("CAET_GOOGLE_CLIENT_ID not set, Google sign-in disabled");
        return;
    };
    let document = gloo_utils::document();
    let login_slot = document.get_element_by_id(GOOGLE_LOGIN_BUTTON_ID);
    let register_slot = document.get_element_by_id(GOOGLE_REGISTER_BUTTON_ID);
    if login_slot.is_none() && register_slot.is_none() {
        return;
    }

    let callback = Closure::<dyn Fn(JsValue)>::new(on_credential);
    let config = js_sys::Object::new();
    let set = |key: &str, value: &JsValue| {
        js_sys::Reflect::set(&config, &JsValue::from_str(key), value)
    };
    if let Err(e) = set("client_id", &JsValue::from_str(client_id))
        .and_then(|_| set("callback", callback.as_ref()))
    {
        warn!("Could not build sign-in config: {:?}", e);
        return;
    }
    gis_initialize(&config);
    // The widget keeps calling back for the page's lifetime.
    callback.forget();

    let buttons = [
        (login_slot, None),
        (register_slot, Some("signup_with")),
    ];
    for (slot, text) in buttons {
        let Some(slot) = slot else { continue };
        let options = ButtonOptions {
            theme: "outline",
            size: "large",
            text,
        };
        match serde_wasm_bindgen::to_value(&options) {
            Ok(options) => gis_render_button(&slot, &options),
            Err(e) => warn!("Could not serialize button options: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::RecordingTransport;
    use crate::api::{ApiResponse, RequestBody};
    use crate::error::TransportError;

    #[tokio::test]
    async fn empty_credential_sends_nothing() {
        let transport = RecordingTransport::default();
        assert_eq!(
            sign_in_with_credential(&transport, None).await.unwrap(),
            SignIn::Ignored
        );
        assert_eq!(
            sign_in_with_credential(&transport, Some("")).await.unwrap(),
            SignIn::Ignored
        );
        assert!(transport.sent().is_empty());
    }

    #[tokio::test]
    async fn credential_is_forwarded_verbatim() {
        let transport = RecordingTransport::replying(Ok(ApiResponse::ok()));
        let outcome = sign_in_with_credential(&transport, Some("eyJ.<opaque>.sig"))
            .await
            .unwrap();
        assert_eq!(outcome, SignIn::SignedIn);
        let sent = transport.sent();
        assert_eq!(sent[0].path, GOOGLE_LOGIN_ENDPOINT);
        assert_eq!(
            sent[0].body,
            RequestBody::Json(json!({ "token": "eyJ.<opaque>.sig" }))
        );
    }

    #[tokio::test]
    async fn sign_in_failures_become_alerts() {
        let transport = RecordingTransport::replying(Ok(ApiResponse::failed("bad token")));
        let err = sign_in_with_credential(&transport, Some("t")).await.unwrap_err();
        assert_eq!(
            failure_message("Google sign-in failed", &err),
            "Google sign-in failed: bad token"
        );

        let transport = RecordingTransport::replying(Err(TransportError::Network("down".into())));
        let err = sign_in_with_credential(&transport, Some("t")).await.unwrap_err();
        assert_eq!(failure_message("Google sign-in failed", &err), MSG_CONNECTION_FAILED);
    }

    #[tokio::test]
    async fn logout_posts_token() {
        let transport = RecordingTransport::replying(Ok(ApiResponse::ok()));
        logout(&transport, "tok-out").await.unwrap();
        assert_eq!(transport.sent()[0].path, LOGOUT_ENDPOINT);
        assert_eq!(
            transport.sent()[0].body,
            RequestBody::Json(json!({ "csrf_token": "tok-out" }))
        );
    }
}
