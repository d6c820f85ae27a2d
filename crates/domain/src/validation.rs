//! Invariant checks shared by the catalog entities.
//!
//! Each check returns on the first violation so callers can chain them with
//! `?` and surface exactly one message.

use crate::error::DomainError;

pub fn not_null<T>(value: Option<T>, field: &str) -> Result<(), DomainError> {
    match value {
        Some(_) => Ok(()),
        None => Err(DomainError::validation(format!(
            "{field} should not be null"
        ))),
    }
}

/// Fails for `None`, the empty string, and whitespace-only strings.
pub fn not_null_or_empty(value: Option<&str>, field: &str) -> Result<(), DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(DomainError::validation(format!(
            "{field} should not be empty or null"
        ))),
    }
}

/// Length is counted in characters, not bytes.
pub fn min_length(value: &str, min: usize, field: &str) -> Result<(), DomainError> {
    if value.chars().count() < min {
        return Err(DomainError::validation(format!(
            "{field} should be at least {min} characters long"
        )));
    }
    Ok(())
}

pub fn max_length(value: &str, max: usize, field: &str) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} should be less or equal {max} characters long"
        )));
    }
    Ok(())
}
