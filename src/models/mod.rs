pub mod appointment;
pub mod enums;
pub mod owner;
pub mod pet;

pub use appointment::*;
pub use enums::*;
pub use owner::*;
pub use pet::*;

use chrono::NaiveDateTime;
use thiserror::Error;

/// Field-level validation failures. Always retryable: the caller re-prompts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Pet cannot be empty")]
    MissingPet,

    #[error("Appointment date and time cannot be empty")]
    MissingDateTime,

    #[error("Appointment cannot be in the past ({})", .requested.format(DATETIME_FORMAT))]
    InPast { requested: NaiveDateTime },

    #[error("Invalid date and time '{0}'. Use HH:mm dd/MM/yyyy")]
    InvalidDateTime(String),

    #[error("Veterinarian name can only contain letters and spaces: '{0}'")]
    InvalidVeterinarian(String),

    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid {field}: {reason}")]
    OutOfRange { field: &'static str, reason: String },

    #[error("{field} cannot contain commas")]
    ContainsComma { field: &'static str },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require_text(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// [`require_text`] for values stored as a single field of a record line,
/// where a comma would split the field on reload.
pub(crate) fn require_field_text(
    value: &str,
    field: &'static str,
) -> Result<String, ValidationError> {
    let text = require_text(value, field)?;
    if text.contains(',') {
        return Err(ValidationError::ContainsComma { field });
    }
    Ok(text)
}
