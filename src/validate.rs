//! Pure sanitization and validation helpers used by every form.

use crate::config::{MAX_PHONE_DIGITS, MIN_PHONE_DIGITS};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

// Permissive `local@domain.tld` shape, not RFC 5322.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Escape `<` and `>` so free text cannot inject markup.
///
/// Ampersands are not escaped, so the output is not safe to decode and
/// sanitize again. Call it once, where raw input is read.
///
/// # Examples
/// ```
/// use caet_portal::validate::sanitize;
/// assert_eq!(sanitize("<b>hi</b>"), "&lt;b&gt;hi&lt;/b&gt;");
/// ```
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn is_valid_email(input: &str) -> bool {
    EMAIL_REGEX.is_match(input)
}

/// Keep only the ASCII digits of a phone number.
pub fn phone_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// A phone is valid when it carries 10 or 11 digits once punctuation is removed.
pub fn is_valid_phone(input: &str) -> bool {
    let digits = phone_digits(input).len();
    (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
}

/// Parse the `YYYY-MM-DD` value produced by a date input.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}

/// Whole years between `birth` and `today`.
///
/// One less than the year difference while today's month/day is still
/// before the birthday.
pub fn compute_age(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}
