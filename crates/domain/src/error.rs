//! Domain error types.

use thiserror::Error;

/// Errors raised by entity invariant checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// An entity field violated its invariant. The message is the first
    /// failing check's text.
    #[error("{0}")]
    Validation(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }
}
