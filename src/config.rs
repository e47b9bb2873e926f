//! Application-level configuration constants.

// Backend endpoints
pub const LOGIN_ENDPOINT: &str = "/login";
pub const REGISTER_ENDPOINT: &str = "/register";
pub const FORGOT_PASSWORD_ENDPOINT: &str = "/forgot-password";
pub const UPLOAD_ENDPOINT: &str = "/upload";
pub const PROFILE_ENDPOINT: &str = "/profile";
pub const FILES_ENDPOINT: &str = "/files";
pub const LOGOUT_ENDPOINT: &str = "/logout";
pub const GOOGLE_LOGIN_ENDPOINT: &str = "/google-login";

// Navigation targets
pub const HOME_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Uploaded files are served from this prefix joined with the stored name.
pub const UPLOADS_PREFIX: &str = "/uploads/";

// Validation thresholds
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_AGE_YEARS: i32 = 13;
pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 11;

// Multipart field names
pub const UPLOAD_FILES_FIELD: &str = "files";
pub const CSRF_FIELD: &str = "csrf_token";

// Host page element ids
pub const CSRF_ID_PREFIX: &str = "csrf-token-";
pub const UPLOAD_INPUT_ID: &str = "upload-file";
pub const GOOGLE_LOGIN_BUTTON_ID: &str = "g_id_onload_login";
pub const GOOGLE_REGISTER_BUTTON_ID: &str = "g_id_onload_register";

/// Google Identity Services client id, baked in at build time.
pub const GOOGLE_CLIENT_ID: Option<&str> = option_env!("CAET_GOOGLE_CLIENT_ID");

// User-facing messages
pub const MSG_CONNECTION_FAILED: &str = "Could not connect to the server.";
pub const MSG_FILES_LOAD_FAILED: &str = "Error loading files.";
pub const MSG_NO_FILES: &str = "No files found.";
pub const MSG_DOWNLOAD: &str = "Download";
