//! Field rules checked before anything is written to the store.

use thiserror::Error;

pub const MIN_INSTRUCTIONS_CHARS: usize = 50;

/// A field-level rejection. The message is logged; clients only ever see the
/// generic validation envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

pub fn validate_username(value: Option<&str>) -> Result<&str, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError("username required")),
    }
}

pub fn validate_title(value: Option<&str>) -> Result<&str, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError("title required")),
    }
}

pub fn validate_instructions(value: Option<&str>) -> Result<&str, ValidationError> {
    match value {
        Some(v) if v.chars().count() >= MIN_INSTRUCTIONS_CHARS => Ok(v),
        _ => Err(ValidationError("instructions too short")),
    }
}
