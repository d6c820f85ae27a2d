//! Category use cases and their DTOs.

mod create;
mod delete;
mod get;
mod list;
mod update;

use chrono::{DateTime, Utc};
use common::EntityId;
use domain::{Aggregate, Category};
use serde::Serialize;

pub use create::{CreateCategory, CreateCategoryInput};
pub use delete::DeleteCategory;
pub use get::GetCategory;
pub use list::ListCategories;
pub use update::{UpdateCategory, UpdateCategoryInput};

/// Category as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryModelOutput {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryModelOutput {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id(),
            name: category.name().to_string(),
            description: category.description().to_string(),
            is_active: category.is_active(),
            created_at: category.created_at(),
        }
    }
}

impl From<Category> for CategoryModelOutput {
    fn from(category: Category) -> Self {
        Self::from(&category)
    }
}
