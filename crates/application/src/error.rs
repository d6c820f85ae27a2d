use common::EntityId;
use domain::{DomainError, RepositoryError};
use thiserror::Error;

/// Errors returned by use cases.
///
/// Use cases never reinterpret these; the HTTP layer is the only place they
/// are translated.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// An entity invariant or input bound was violated.
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("{entity_type} '{id}' not found.")]
    NotFound {
        entity_type: &'static str,
        id: EntityId,
    },

    /// A referenced aggregate, such as a genre's category, does not exist.
    #[error("{0}")]
    RelatedAggregate(String),

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("{0}")]
    Unexpected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApplicationError {
    /// Short label used as the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ApplicationError::Validation(_) => "validation",
            ApplicationError::NotFound { .. } => "not_found",
            ApplicationError::RelatedAggregate(_) => "related_aggregate",
            ApplicationError::Cancelled => "cancelled",
            ApplicationError::Unexpected(_) => "unexpected",
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity_type, id } => {
                ApplicationError::NotFound { entity_type, id }
            }
            RepositoryError::Storage(source) => ApplicationError::Unexpected(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failures_become_unexpected() {
        let err: ApplicationError =
            RepositoryError::Storage(Box::new(std::io::Error::other("disk on fire"))).into();
        assert_eq!(err.kind(), "unexpected");
        assert_eq!(err.to_string(), "disk on fire");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn not_found_keeps_entity_and_id() {
        let id = EntityId::new();
        let err: ApplicationError = RepositoryError::NotFound {
            entity_type: "Genre",
            id,
        }
        .into();
        assert_eq!(err.to_string(), format!("Genre '{id}' not found."));
    }

    #[test]
    fn validation_message_is_verbatim() {
        let err: ApplicationError =
            DomainError::validation("Name should not be empty or null").into();
        assert_eq!(err.to_string(), "Name should not be empty or null");
        assert_eq!(err.kind(), "validation");
    }
}
