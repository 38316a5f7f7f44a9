//! Field validation shared by companies and products
//!
//! These are the constraints the HTTP boundary and ingestion enforce before
//! anything reaches the store.

use std::fmt;

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field name as it appears on the wire
    pub field: &'static str,

    /// Human readable reason
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check the character length of a string field
///
/// `max` of `None` means unbounded.
pub fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: Option<usize>,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::new(
            field,
            format!("must be at least {} characters", min),
        ));
    }
    if let Some(max) = max {
        if len > max {
            return Err(ValidationError::new(
                field,
                format!("must be at most {} characters", max),
            ));
        }
    }
    Ok(())
}

/// Check an integer field against an inclusive range
pub fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
