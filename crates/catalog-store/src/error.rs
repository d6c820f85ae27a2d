use common::EntityId;
use domain::RepositoryError;
use thiserror::Error;

/// Errors that can occur when interacting with a catalog store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An update or delete targeted a row that no longer exists.
    #[error("{entity_type} '{id}' not found.")]
    NotFound {
        entity_type: &'static str,
        id: EntityId,
    },

    /// An insert reused an id that is already stored.
    #[error("{entity_type} '{id}' already exists")]
    Duplicate {
        entity_type: &'static str,
        id: EntityId,
    },

    /// A genre links a category that is not stored.
    #[error("{entity_type} '{id}' is referenced but does not exist")]
    MissingReference {
        entity_type: &'static str,
        id: EntityId,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity_type, id } => {
                RepositoryError::NotFound { entity_type, id }
            }
            other => RepositoryError::Storage(Box::new(other)),
        }
    }
}
