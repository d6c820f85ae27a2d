//! Shared types used across the catalog crates.

pub mod types;

pub use types::{EntityId, now};
