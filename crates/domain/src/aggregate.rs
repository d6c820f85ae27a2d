//! Core aggregate trait.

use chrono::{DateTime, Utc};
use common::EntityId;

/// Trait for catalog aggregates.
///
/// An aggregate is the unit a repository persists and the search engine
/// filters and orders. The accessors here are exactly the fields every
/// listing can filter or sort on.
pub trait Aggregate: Clone + Send + Sync + 'static {
    /// Entity type name, used in not-found messages.
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> EntityId;

    fn name(&self) -> &str;

    fn created_at(&self) -> DateTime<Utc>;
}
