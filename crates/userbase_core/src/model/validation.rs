//! Field-level rules shared by account and profile records.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Field rule violated by a record before it reaches SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty or whitespace-only.
    Required { field: &'static str },
    /// Field exceeds its bounded length (chars for text, bytes for blobs).
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required { field } => write!(f, "{field} is required"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} must be at most {max} long, got {actual}")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    check_text(field, value, max)
}

pub(crate) fn check_optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(value) => check_text(field, value, max),
        None => Ok(()),
    }
}

pub(crate) fn check_optional_bytes(
    field: &'static str,
    value: Option<&[u8]>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(bytes) if bytes.len() > max => Err(ValidationError::TooLong {
            field,
            max,
            actual: bytes.len(),
        }),
        _ => Ok(()),
    }
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    // SQLite `length()` counts characters, so the bound does too.
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}
