//! Genre aggregate.

use chrono::{DateTime, Utc};
use common::EntityId;

use crate::aggregate::Aggregate;
use crate::error::DomainError;
use crate::validation;

/// A genre groups categories under a single label.
///
/// The category list holds loose references: the entity never checks that
/// the ids exist, the use case does before attaching them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    id: EntityId,
    name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    categories: Vec<EntityId>,
}

impl Genre {
    pub fn new(name: impl Into<String>, is_active: bool) -> Result<Self, DomainError> {
        let name = name.into();
        Self::validate(&name)?;

        Ok(Self {
            id: EntityId::new(),
            name,
            is_active,
            created_at: common::now(),
            categories: Vec::new(),
        })
    }

    /// Rebuilds a genre from persisted fields without re-validating.
    pub fn restore(
        id: EntityId,
        name: String,
        is_active: bool,
        created_at: DateTime<Utc>,
        categories: Vec<EntityId>,
    ) -> Self {
        Self {
            id,
            name,
            is_active,
            created_at,
            categories,
        }
    }

    /// On failure the genre is left unchanged.
    pub fn update(&mut self, name: impl Into<String>) -> Result<(), DomainError> {
        let name = name.into();
        Self::validate(&name)?;
        self.name = name;
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn add_category(&mut self, category_id: EntityId) -> Result<(), DomainError> {
        self.categories.push(category_id);
        Self::validate(&self.name)
    }

    /// Removes the first occurrence of `category_id`, if any.
    pub fn remove_category(&mut self, category_id: EntityId) -> Result<(), DomainError> {
        if let Some(pos) = self.categories.iter().position(|id| *id == category_id) {
            self.categories.remove(pos);
        }
        Self::validate(&self.name)
    }

    pub fn remove_all_categories(&mut self) -> Result<(), DomainError> {
        self.categories.clear();
        Self::validate(&self.name)
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn categories(&self) -> &[EntityId] {
        &self.categories
    }

    fn validate(name: &str) -> Result<(), DomainError> {
        validation::not_null_or_empty(Some(name), "Name")
    }
}

impl Aggregate for Genre {
    const ENTITY_TYPE: &'static str = "Genre";

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
