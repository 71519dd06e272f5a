//! Validation error types

use std::fmt;

/// Validation error for request input
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Value doesn't parse into the expected shape (UUID, date, ...)
    InvalidFormat { field: &'static str, reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => {
                write!(f, "{}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a required, length-bounded text field.
///
/// Length is counted in characters, matching `VARCHAR(n)` in Postgres.
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(())
}

/// Like [`require_text`] but an empty value is accepted (it means "keep").
pub fn optional_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "song",
            max: 255,
        };
        assert_eq!(
            err.to_string(),
            "song exceeds maximum length of 255 characters"
        );
    }

    #[test]
    fn require_text_rejects_blank() {
        let err = require_text("group", "   ", 255).unwrap_err();
        assert!(matches!(err, ValidationError::Empty { field: "group" }));
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        // 255 two-byte characters still fit
        let name = "é".repeat(255);
        assert!(require_text("song", &name, 255).is_ok());

        let name = "é".repeat(256);
        let err = require_text("song", &name, 255).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 255, .. }));
    }

    #[test]
    fn optional_text_allows_empty() {
        assert!(optional_text("song", "", 255).is_ok());
        assert!(optional_text("song", &"a".repeat(256), 255).is_err());
    }
}
