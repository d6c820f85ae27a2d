//! Persistence contracts implemented by the catalog stores.

use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use thiserror::Error;

use crate::aggregate::Aggregate;
use crate::category::Category;
use crate::genre::Genre;
use crate::search::{SearchInput, SearchOutput};

/// Errors that can occur when interacting with a repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No entity with this id exists in the store.
    #[error("{entity_type} '{id}' not found.")]
    NotFound {
        entity_type: &'static str,
        id: EntityId,
    },

    /// The underlying store failed.
    #[error("Storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    pub fn not_found<A: Aggregate>(id: EntityId) -> Self {
        RepositoryError::NotFound {
            entity_type: A::ENTITY_TYPE,
            id,
        }
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Generic persistence contract for one aggregate type.
///
/// Writes are buffered in the session's unit of work and only reach the
/// store on [`UnitOfWork::commit`]. Reads see committed state.
#[async_trait]
pub trait Repository<A: Aggregate>: Send + Sync {
    async fn insert(&self, aggregate: &A) -> Result<()>;

    /// Fails with [`RepositoryError::NotFound`] when the id is absent.
    async fn get(&self, id: EntityId) -> Result<A>;

    async fn update(&self, aggregate: &A) -> Result<()>;

    async fn delete(&self, aggregate: &A) -> Result<()>;

    /// Filters by name substring, orders, and pages.
    async fn search(&self, input: &SearchInput) -> Result<SearchOutput<A>>;
}

#[async_trait]
pub trait CategoryRepository: Repository<Category> {
    /// Returns the subset of `ids` that exist, in one round trip.
    async fn get_ids_list_by_ids(&self, ids: &[EntityId]) -> Result<Vec<EntityId>>;
}

pub trait GenreRepository: Repository<Genre> {}

/// Commits or discards the writes buffered during one request.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Applies every pending write atomically. Nothing is persisted on error.
    async fn commit(&self) -> Result<()>;

    async fn rollback(&self) -> Result<()>;
}

/// Repositories and unit of work sharing one pending-change buffer.
///
/// A session is scoped to a single request and is not shared between
/// requests.
#[derive(Clone)]
pub struct Session {
    categories: Arc<dyn CategoryRepository>,
    genres: Arc<dyn GenreRepository>,
    unit_of_work: Arc<dyn UnitOfWork>,
}

impl Session {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        genres: Arc<dyn GenreRepository>,
        unit_of_work: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            categories,
            genres,
            unit_of_work,
        }
    }

    pub fn categories(&self) -> Arc<dyn CategoryRepository> {
        self.categories.clone()
    }

    pub fn genres(&self) -> Arc<dyn GenreRepository> {
        self.genres.clone()
    }

    pub fn unit_of_work(&self) -> Arc<dyn UnitOfWork> {
        self.unit_of_work.clone()
    }
}

/// Factory for per-request sessions.
pub trait CatalogStore: Send + Sync {
    fn session(&self) -> Session;
}
