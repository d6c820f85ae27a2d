//! Domain layer of the video catalog.
//!
//! This crate provides:
//! - Invariant checks shared by all entities
//! - Category and Genre aggregates
//! - The search/pagination contract used by every listing
//! - Repository, unit-of-work and session traits implemented by stores

pub mod aggregate;
pub mod category;
pub mod error;
pub mod genre;
pub mod repository;
pub mod search;
pub mod validation;

pub use aggregate::Aggregate;
pub use category::Category;
pub use common::EntityId;
pub use error::DomainError;
pub use genre::Genre;
pub use repository::{
    CatalogStore, CategoryRepository, GenreRepository, Repository, RepositoryError, Session,
    UnitOfWork,
};
pub use search::{SearchInput, SearchOrder, SearchOutput, SortField};
