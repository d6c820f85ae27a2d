//! Application layer of the video catalog.
//!
//! Every operation is a [`UseCase`] built from one request's [`domain::Session`].
//! Use cases validate through the domain entities, buffer writes in the
//! session's repositories, and finish with a single commit.

pub mod category;
pub mod error;
pub mod genre;
pub mod listing;
pub mod use_case;

pub use category::{
    CategoryModelOutput, CreateCategory, CreateCategoryInput, DeleteCategory, GetCategory,
    ListCategories, UpdateCategory, UpdateCategoryInput,
};
pub use error::{ApplicationError, Result};
pub use genre::{
    CreateGenre, CreateGenreInput, DeleteGenre, GenreModelOutput, GetGenre, ListGenres,
    UpdateGenre, UpdateGenreInput,
};
pub use listing::{ListInput, PaginatedListOutput};
pub use use_case::UseCase;
