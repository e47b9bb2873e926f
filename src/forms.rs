//! Per-form policy: which fields are read, how they are cleaned, the ordered
//! checks they must pass, the request they become, and what happens on success.

use crate::api::ApiRequest;
use crate::config::*;
use crate::error::{ValidationError, ValidationKind};
use crate::validate::{compute_age, is_valid_email, is_valid_phone, parse_date, sanitize};
use crate::view::Tab;
use crate::{FormKind, UploadFile};
use chrono::NaiveDate;
use serde_json::json;
use std::collections::BTreeMap;

/// How a raw field value is cleaned when it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    /// Passwords and dates: taken as typed.
    Raw,
    TrimSanitize,
    TrimLowerSanitize,
}

/// One input element read at submit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub element_id: &'static str,
    pub treatment: Treatment,
}

impl FieldSpec {
    pub const fn new(key: &'static str, element_id: &'static str, treatment: Treatment) -> Self {
        Self {
            key,
            element_id,
            treatment,
        }
    }

    pub fn clean(&self, raw: &str) -> String {
        match self.treatment {
            Treatment::Raw => raw.to_string(),
            Treatment::TrimSanitize => sanitize(raw.trim()),
            Treatment::TrimLowerSanitize => sanitize(&raw.trim().to_lowercase()),
        }
    }
}

/// Field values pulled from a form at submit time.
///
/// Values are cleaned once on the way in and never again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    fields: BTreeMap<&'static str, String>,
    pub files: Vec<UploadFile>,
}

impl FormInput {
    /// Read every field through `read(element_id)` and clean it.
    pub fn extract(fields: &[FieldSpec], mut read: impl FnMut(&str) -> String) -> Self {
        let fields = fields
            .iter()
            .map(|spec| (spec.key, spec.clean(&read(spec.element_id))))
            .collect();
        Self {
            fields,
            files: Vec::new(),
        }
    }

    pub fn with_files(mut self, files: Vec<UploadFile>) -> Self {
        self.files = files;
        self
    }

    /// Empty string for fields the form does not carry.
    pub fn get(&self, key: &str) -> &str {
        self.fields.get(key).map(String::as_str).unwrap_or("")
    }
}

/// A single local check. Rules run in declaration order and the first
/// failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required {
        field: &'static str,
        message: &'static str,
    },
    /// Present and shaped like an email address.
    Email { field: &'static str },
    MinLength { field: &'static str, min: usize },
    Matches {
        field: &'static str,
        other: &'static str,
    },
    MinAge { field: &'static str, years: i32 },
    /// Present and carrying 10-11 digits.
    Phone { field: &'static str },
    FilesSelected,
}

impl Rule {
    pub fn check(&self, input: &FormInput, today: NaiveDate) -> Result<(), ValidationError> {
        match *self {
            Rule::Required { field, message } => {
                if input.get(field).is_empty() {
                    return Err(ValidationError::new(ValidationKind::MissingField, message));
                }
            }
            Rule::Email { field } => {
                let value = input.get(field);
                if value.is_empty() || !is_valid_email(value) {
                    return Err(ValidationError::new(
                        ValidationKind::InvalidEmail,
                        "Please enter a valid email.",
                    ));
                }
            }
            Rule::MinLength { field, min } => {
                if input.get(field).chars().count() < min {
                    return Err(ValidationError::new(
                        ValidationKind::PasswordTooShort,
                        format!("Password must be at least {} characters.", min),
                    ));
                }
            }
            Rule::Matches { field, other } => {
                if input.get(field) != input.get(other) {
                    return Err(ValidationError::new(
                        ValidationKind::PasswordMismatch,
                        "Passwords do not match.",
                    ));
                }
            }
            Rule::MinAge { field, years } => {
                let birth = parse_date(input.get(field)).ok_or_else(|| {
                    ValidationError::new(
                        ValidationKind::InvalidDate,
                        "Please enter a valid date of birth.",
                    )
                })?;
                if compute_age(birth, today) < years {
                    return Err(ValidationError::new(
                        ValidationKind::Underage,
                        format!("You must be at least {} years old.", years),
                    ));
                }
            }
            Rule::Phone { field } => {
                let value = input.get(field);
                if value.is_empty() {
                    return Err(ValidationError::new(
                        ValidationKind::MissingField,
                        "Please enter a phone number.",
                    ));
                }
                if !is_valid_phone(value) {
                    return Err(ValidationError::new(
                        ValidationKind::InvalidPhone,
                        format!(
                            "Please enter a valid phone number ({}-{} digits).",
                            MIN_PHONE_DIGITS, MAX_PHONE_DIGITS
                        ),
                    ));
                }
            }
            Rule::FilesSelected => {
                if input.files.is_empty() {
                    return Err(ValidationError::new(
                        ValidationKind::NoFilesSelected,
                        "Please select at least one file.",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// What the UI does once the backend accepts a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuccessAction {
    Redirect {
        notice: String,
        target: &'static str,
    },
    ResetAndShowTab {
        notice: String,
        tab: Tab,
    },
    Notify {
        notice: String,
    },
    /// Reset the form and reload the file list if one is shown.
    ResetAndRefreshFiles {
        notice: String,
    },
}

impl SuccessAction {
    pub fn notice(&self) -> &str {
        match self {
            SuccessAction::Redirect { notice, .. }
            | SuccessAction::ResetAndShowTab { notice, .. }
            | SuccessAction::Notify { notice }
            | SuccessAction::ResetAndRefreshFiles { notice } => notice,
        }
    }
}

/// Everything the submission pipeline needs to know about one form.
#[derive(Debug, Clone, Copy)]
pub struct FormSpec {
    pub kind: FormKind,
    pub fields: &'static [FieldSpec],
    pub rules: &'static [Rule],
    pub build_request: fn(&FormInput, &str) -> ApiRequest,
    pub on_success: fn(&FormInput) -> SuccessAction,
    /// Shown when the server fails without a message.
    pub failure_fallback: &'static str,
}

const NAME_REQUIRED: &str = "Please enter your name.";
const DOB_REQUIRED: &str = "Please select your date of birth.";

pub const LOGIN: FormSpec = FormSpec {
    kind: FormKind::Login,
    fields: &[
        FieldSpec::new("email", "login-email", Treatment::TrimLowerSanitize),
        FieldSpec::new("password", "login-password", Treatment::TrimSanitize),
    ],
    rules: &[
        Rule::Email { field: "email" },
        Rule::Required {
            field: "password",
            message: "Please enter a password.",
        },
    ],
    build_request: |input, csrf| {
        ApiRequest::post_json(
            LOGIN_ENDPOINT,
            json!({
                "email": input.get("email"),
                "password": input.get("password"),
                "csrf_token": csrf,
            }),
        )
    },
    on_success: |_| SuccessAction::Redirect {
        notice: "Login successful!".into(),
        target: DASHBOARD_PATH,
    },
    failure_fallback: "Login failed.",
};

pub const REGISTER: FormSpec = FormSpec {
    kind: FormKind::Register,
    fields: &[
        FieldSpec::new("name", "register-name", Treatment::TrimSanitize),
        FieldSpec::new("email", "register-email", Treatment::TrimSanitize),
        FieldSpec::new("password", "register-password", Treatment::Raw),
        FieldSpec::new("confirm_password", "register-confirm-password", Treatment::Raw),
        FieldSpec::new("dob", "register-dob", Treatment::Raw),
        FieldSpec::new("phone", "register-phone", Treatment::TrimSanitize),
    ],
    rules: &[
        Rule::Required {
            field: "name",
            message: NAME_REQUIRED,
        },
        Rule::Email { field: "email" },
        Rule::MinLength {
            field: "password",
            min: MIN_PASSWORD_LEN,
        },
        Rule::Matches {
            field: "password",
            other: "confirm_password",
        },
        Rule::Required {
            field: "dob",
            message: DOB_REQUIRED,
        },
        Rule::MinAge {
            field: "dob",
            years: MIN_AGE_YEARS,
        },
        Rule::Phone { field: "phone" },
    ],
    build_request: |input, csrf| {
        ApiRequest::post_json(
            REGISTER_ENDPOINT,
            json!({
                "name": input.get("name"),
                "email": input.get("email"),
                "password": input.get("password"),
                "dob": input.get("dob"),
                "phone": input.get("phone"),
                "csrf_token": csrf,
            }),
        )
    },
    on_success: |_| SuccessAction::ResetAndShowTab {
        notice: "Registration complete!".into(),
        tab: Tab::Login,
    },
    failure_fallback: "Registration failed.",
};

pub const FORGOT_PASSWORD: FormSpec = FormSpec {
    kind: FormKind::ForgotPassword,
    fields: &[FieldSpec::new("email", "forgot-email", Treatment::TrimSanitize)],
    rules: &[Rule::Email { field: "email" }],
    build_request: |input, csrf| {
        ApiRequest::post_json(
            FORGOT_PASSWORD_ENDPOINT,
            json!({ "email": input.get("email"), "csrf_token": csrf }),
        )
    },
    on_success: |_| SuccessAction::Notify {
        notice: "Recovery email sent!".into(),
    },
    failure_fallback: "Request failed.",
};

pub const UPLOAD: FormSpec = FormSpec {
    kind: FormKind::Upload,
    fields: &[],
    rules: &[Rule::FilesSelected],
    build_request: |input, csrf| {
        ApiRequest::post_multipart(UPLOAD_ENDPOINT, input.files.clone(), csrf.to_string())
    },
    on_success: |input| SuccessAction::ResetAndRefreshFiles {
        notice: format!("Upload of {} file(s) succeeded!", input.files.len()),
    },
    failure_fallback: "Upload failed.",
};

pub const PROFILE: FormSpec = FormSpec {
    kind: FormKind::Profile,
    fields: &[
        FieldSpec::new("name", "profile-name", Treatment::TrimSanitize),
        FieldSpec::new("phone", "profile-phone", Treatment::TrimSanitize),
        FieldSpec::new("dob", "profile-dob", Treatment::Raw),
    ],
    rules: &[
        Rule::Required {
            field: "name",
            message: NAME_REQUIRED,
        },
        Rule::Required {
            field: "dob",
            message: DOB_REQUIRED,
        },
        Rule::MinAge {
            field: "dob",
            years: MIN_AGE_YEARS,
        },
        Rule::Phone { field: "phone" },
    ],
    build_request: |input, csrf| {
        ApiRequest::post_json(
            PROFILE_ENDPOINT,
            json!({
                "name": input.get("name"),
                "phone": input.get("phone"),
                "dob": input.get("dob"),
                "csrf_token": csrf,
            }),
        )
    },
    on_success: |_| SuccessAction::Notify {
        notice: "Profile updated successfully!".into(),
    },
    failure_fallback: "Profile update failed.",
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn input(spec: &FormSpec, values: &[(&str, &str)]) -> FormInput {
        let by_id: HashMap<&str, &str> = values.iter().copied().collect();
        FormInput::extract(spec.fields, |id| by_id.get(id).copied().unwrap_or("").to_string())
    }

    fn first_failure(spec: &FormSpec, input: &FormInput) -> Option<ValidationError> {
        spec.rules
            .iter()
            .find_map(|rule| rule.check(input, today()).err())
    }

    fn register_values<'a>(overrides: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
        let mut values = vec![
            ("register-name", "Ana"),
            ("register-email", "ana@example.com"),
            ("register-password", "secret1"),
            ("register-confirm-password", "secret1"),
            ("register-dob", "2000-05-01"),
            ("register-phone", "(11) 91234-5678"),
        ];
        for &(id, value) in overrides {
            for slot in values.iter_mut().filter(|slot| slot.0 == id) {
                slot.1 = value;
            }
        }
        values
    }

    #[test]
    fn login_email_is_trimmed_lowered_and_sanitized() {
        let form = input(
            &LOGIN,
            &[("login-email", "  Ana<x>@Example.COM "), ("login-password", " pw ")],
        );
        assert_eq!(form.get("email"), "ana&lt;x&gt;@example.com");
        assert_eq!(form.get("password"), "pw");
    }

    #[test]
    fn register_passwords_are_taken_raw() {
        let form = input(&REGISTER, &register_values(&[("register-password", " <pw> ")]));
        assert_eq!(form.get("password"), " <pw> ");
    }

    #[test]
    fn valid_register_passes_every_rule() {
        let form = input(&REGISTER, &register_values(&[]));
        assert_eq!(first_failure(&REGISTER, &form), None);
    }

    #[test]
    fn register_checks_run_in_order() {
        let form = input(
            &REGISTER,
            &register_values(&[("register-name", "  "), ("register-email", "bad")]),
        );
        assert_eq!(
            first_failure(&REGISTER, &form).unwrap().kind,
            ValidationKind::MissingField
        );

        let form = input(
            &REGISTER,
            &register_values(&[("register-password", "12345"), ("register-phone", "1")]),
        );
        let err = first_failure(&REGISTER, &form).unwrap();
        assert_eq!(err.kind, ValidationKind::PasswordTooShort);
        assert!(err.message.contains("at least 6 characters"));
    }

    #[test]
    fn register_rejects_mismatch_underage_and_bad_phone() {
        let cases = [
            ("register-confirm-password", "other1", ValidationKind::PasswordMismatch),
            ("register-dob", "", ValidationKind::MissingField),
            ("register-dob", "2013-10-20", ValidationKind::Underage),
            ("register-phone", "", ValidationKind::MissingField),
            ("register-phone", "123", ValidationKind::InvalidPhone),
        ];
        for (id, value, kind) in cases {
            let form = input(&REGISTER, &register_values(&[(id, value)]));
            assert_eq!(first_failure(&REGISTER, &form).unwrap().kind, kind, "{id}={value}");
        }
    }

    #[test]
    fn thirteenth_birthday_is_old_enough() {
        let form = input(&REGISTER, &register_values(&[("register-dob", "2013-10-19")]));
        assert_eq!(first_failure(&REGISTER, &form), None);
    }

    #[test]
    fn profile_requires_name_dob_and_phone() {
        let form = input(
            &PROFILE,
            &[
                ("profile-name", "Ana"),
                ("profile-phone", "11912345678"),
                ("profile-dob", "not-a-date"),
            ],
        );
        assert_eq!(
            first_failure(&PROFILE, &form).unwrap().kind,
            ValidationKind::InvalidDate
        );
    }

    #[test]
    fn upload_needs_a_file() {
        let empty = FormInput::default();
        assert_eq!(
            first_failure(&UPLOAD, &empty).unwrap().kind,
            ValidationKind::NoFilesSelected
        );

        let one = FormInput::default().with_files(vec![UploadFile::new(
            "a.txt",
            "text/plain",
            b"hi".to_vec(),
        )]);
        assert_eq!(first_failure(&UPLOAD, &one), None);
        assert_eq!(
            (UPLOAD.on_success)(&one).notice(),
            "Upload of 1 file(s) succeeded!"
        );
    }

    #[test]
    fn forgot_password_body_carries_token() {
        let form = input(&FORGOT_PASSWORD, &[("forgot-email", " a@b.co ")]);
        let request = (FORGOT_PASSWORD.build_request)(&form, "tok");
        assert_eq!(request.path, FORGOT_PASSWORD_ENDPOINT);
        assert_eq!(
            request.body,
            crate::api::RequestBody::Json(json!({"email": "a@b.co", "csrf_token": "tok"}))
        );
    }
}
