//! Category aggregate.

use chrono::{DateTime, Utc};
use common::EntityId;

use crate::aggregate::Aggregate;
use crate::error::DomainError;
use crate::validation;

pub const NAME_MIN_LENGTH: usize = 3;
pub const NAME_MAX_LENGTH: usize = 255;
pub const DESCRIPTION_MAX_LENGTH: usize = 10_000;

/// A video category such as "Documentary" or "Sci-fi".
///
/// Fields are private so every mutation goes through a method that keeps the
/// name and description within bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: EntityId,
    name: String,
    description: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category with a fresh id and the current time.
    ///
    /// `description` is `None` only when a caller explicitly passed a null;
    /// an omitted description should be `Some(String::new())`.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        is_active: bool,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        Self::validate(&name, description.as_deref())?;

        Ok(Self {
            id: EntityId::new(),
            name,
            description: description.unwrap_or_default(),
            is_active,
            created_at: common::now(),
        })
    }

    /// Rebuilds a category from persisted fields without re-validating.
    pub fn restore(
        id: EntityId,
        name: String,
        description: String,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            is_active,
            created_at,
        }
    }

    /// Replaces the name and, when given, the description.
    ///
    /// On failure the category is left unchanged.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<(), DomainError> {
        let name = name.into();
        let description = description.unwrap_or_else(|| self.description.clone());
        Self::validate(&name, Some(&description))?;

        self.name = name;
        self.description = description;
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    fn validate(name: &str, description: Option<&str>) -> Result<(), DomainError> {
        validation::not_null_or_empty(Some(name), "Name")?;
        validation::min_length(name, NAME_MIN_LENGTH, "Name")?;
        validation::max_length(name, NAME_MAX_LENGTH, "Name")?;
        validation::not_null(description, "Description")?;
        if let Some(description) = description {
            validation::max_length(description, DESCRIPTION_MAX_LENGTH, "Description")?;
        }
        Ok(())
    }
}

impl Aggregate for Category {
    const ENTITY_TYPE: &'static str = "Category";

    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
