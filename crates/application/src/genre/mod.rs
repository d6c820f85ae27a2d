//! Genre use cases and their DTOs.

mod create;
mod delete;
mod get;
mod list;
mod update;

use chrono::{DateTime, Utc};
use common::EntityId;
use domain::{Aggregate, CategoryRepository, Genre};
use serde::Serialize;

use crate::error::{ApplicationError, Result};

pub use create::{CreateGenre, CreateGenreInput};
pub use delete::DeleteGenre;
pub use get::GetGenre;
pub use list::ListGenres;
pub use update::{UpdateGenre, UpdateGenreInput};

/// Genre as returned to callers, with its category ids in stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreModelOutput {
    pub id: EntityId,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub categories: Vec<EntityId>,
}

impl From<&Genre> for GenreModelOutput {
    fn from(genre: &Genre) -> Self {
        Self {
            id: genre.id(),
            name: genre.name().to_string(),
            is_active: genre.is_active(),
            created_at: genre.created_at(),
            categories: genre.categories().to_vec(),
        }
    }
}

impl From<Genre> for GenreModelOutput {
    fn from(genre: Genre) -> Self {
        Self::from(&genre)
    }
}

/// Checks in one batched query that every id names an existing category.
///
/// Missing ids are reported in input order, joined with ", ".
async fn ensure_categories_exist(
    categories: &dyn CategoryRepository,
    ids: &[EntityId],
) -> Result<()> {
    let existing = categories.get_ids_list_by_ids(ids).await?;

    let missing: Vec<String> = ids
        .iter()
        .filter(|id| !existing.contains(id))
        .map(ToString::to_string)
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    Err(ApplicationError::RelatedAggregate(format!(
        "Related category id (or ids) not found: '{}'",
        missing.join(", ")
    )))
}

/// Replaces the genre's category list after checking every id exists.
async fn assign_categories(
    genre: &mut Genre,
    categories: &dyn CategoryRepository,
    ids: &[EntityId],
) -> Result<()> {
    if !ids.is_empty() {
        ensure_categories_exist(categories, ids).await?;
    }
    genre.remove_all_categories()?;
    for id in ids {
        genre.add_category(*id)?;
    }
    Ok(())
}
