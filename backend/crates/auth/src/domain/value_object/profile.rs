//! Profile Value Objects
//!
//! Free-text profile fields are sanitized before they are stored, since they
//! are echoed back to storefront pages.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LENGTH: usize = 50;
pub const PHONE_MIN_LENGTH: usize = 7;
pub const PHONE_MAX_LENGTH: usize = 20;

/// Strip markup and script vectors from free text
///
/// Removes `<`, `>`, any `javascript:` scheme (case-insensitive) and inline
/// `on<event>=` handler attributes, then trims.
pub fn sanitize(input: &str) -> String {
    let without_tags: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    let without_scheme = remove_ci(&without_tags, "javascript:");
    strip_event_handlers(&without_scheme).trim().to_string()
}

fn remove_ci(haystack: &str, needle: &str) -> String {
    let mut out = haystack.to_string();
    while let Some(pos) = out.to_ascii_lowercase().find(needle) {
        out.replace_range(pos..pos + needle.len(), "");
    }
    out
}

/// Drops `on\w+=` sequences
fn strip_event_handlers(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let is_on = i + 1 < chars.len()
            && chars[i].eq_ignore_ascii_case(&'o')
            && chars[i + 1].eq_ignore_ascii_case(&'n');
        if is_on {
            let mut j = i + 2;
            while j < chars.len() && (chars[j].is_alphanumeric() || chars[j] == '_') {
                j += 1;
            }
            if j > i + 2 && j < chars.len() && chars[j] == '=' {
                i = j + 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// First or last name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName(String);

impl PersonName {
    pub fn new(raw: &str, field: &'static str) -> AppResult<Self> {
        let cleaned = sanitize(raw);
        let len = cleaned.chars().count();

        if len == 0 {
            return Err(AppError::bad_request(format!("{field} is required")));
        }
        if len > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "{field} must be at most {NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(cleaned))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Contact phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: &str) -> AppResult<Self> {
        let cleaned = raw.trim();

        if cleaned.is_empty() {
            return Err(AppError::bad_request("Phone is required"));
        }

        let valid_chars = cleaned
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
        let len = cleaned.chars().count();

        if !valid_chars || !(PHONE_MIN_LENGTH..=PHONE_MAX_LENGTH).contains(&len) {
            return Err(AppError::bad_request("Invalid phone number")
                .with_action("Use 7-20 digits, spaces, '+', '-' or parentheses"));
        }

        Ok(Self(cleaned.to_string()))
    }

    pub fn from_db(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
