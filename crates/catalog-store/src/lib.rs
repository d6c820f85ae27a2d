pub mod error;
pub mod memory;
pub mod pending;
pub mod postgres;
pub mod query;

pub use error::{Result, StoreError};
pub use memory::{InMemoryCatalog, InMemorySession};
pub use pending::{PendingChange, PendingChanges};
pub use postgres::{PostgresCatalog, PostgresSession};
pub use query::SearchQuery;
