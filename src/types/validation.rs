//! Request validation helpers.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError};

use crate::errors::{AuthError, AuthResult};

/// International phone number shape: optional country code, separators
/// allowed between groups.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,9}$")
        .expect("phone pattern is a valid regex")
});

/// Custom validator for optional phone number fields.
///
/// Absent values pass; presence checks belong to `required` constraints.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    if PHONE_PATTERN.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("phone").with_message("Invalid phone number format".into()))
    }
}

/// Run declarative validation on a request DTO, collapsing field errors
/// into a single client-facing message.
pub fn validate_request<T: Validate>(request: &T) -> AuthResult<()> {
    request.validate().map_err(|errors| {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: invalid value", field),
                })
            })
            .collect();
        messages.sort();
        AuthError::validation(messages.join("; "))
    })
}
