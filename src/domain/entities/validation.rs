use std::borrow::Cow;

use validator::ValidationError;

use crate::entities::option_fields::PatchString;

pub const BLANK_MESSAGE: &str = "This field may not be blank.";
pub const REQUIRED_MESSAGE: &str = "This field is required.";

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(new_validation_error("blank", BLANK_MESSAGE));
    }
    Ok(())
}

/// Blank check for a patched text field; absent and null patches pass.
pub fn validate_not_blank_patch(value: &PatchString) -> Result<(), ValidationError> {
    match value.value_ref() {
        Some(text) => validate_not_blank(text),
        None => Ok(()),
    }
}

pub fn validate_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url) {
        Ok(parsed) => {
            if parsed.scheme() == "http" || parsed.scheme() == "https" {
                Ok(())
            } else {
                Err(new_validation_error("invalid_url_scheme", "URL must start with http:// or https://"))
            }
        }
        Err(_) => Err(new_validation_error("invalid_url", "Enter a valid URL.")),
    }
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

/// Strips surrounding whitespace in place so that validation sees the stored value.
pub fn trim_input(value: &mut Option<String>) {
    if let Some(text) = value {
        let trimmed = text.trim();
        if trimmed.len() != text.len() {
            *text = trimmed.to_string();
        }
    }
}

/// Trimmed copy of a required text field; `validate()` has already rejected `None`.
pub fn take_trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Optional link fields: blank input means "no link".
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
