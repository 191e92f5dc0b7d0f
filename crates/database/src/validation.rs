//! Input validation for free-text fields.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for feedback text.
pub const MAX_FEEDBACK_LENGTH: usize = 2000;

/// Validate feedback text, returning it trimmed.
pub fn validate_feedback(content: &str) -> Result<&str, ValidationError> {
    let trimmed = content.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::Empty("feedback".to_string()));
    }

    let length = trimmed.chars().count();
    if length > MAX_FEEDBACK_LENGTH {
        return Err(ValidationError::TooLong {
            field: "feedback".to_string(),
            max: MAX_FEEDBACK_LENGTH,
            actual: length,
        });
    }

    Ok(trimmed)
}
