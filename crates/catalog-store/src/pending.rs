//! Write buffer shared by a session's repositories and its unit of work.

use common::EntityId;
use domain::{Category, Genre};
use tokio::sync::Mutex;

/// A single write waiting for commit.
///
/// Each variant maps to one explicit statement at commit time; nothing is
/// diffed or tracked implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    InsertCategory(Category),
    UpdateCategory(Category),
    DeleteCategory(EntityId),
    InsertGenre(Genre),
    UpdateGenre(Genre),
    DeleteGenre(EntityId),
}

/// Ordered list of pending writes.
#[derive(Debug, Default)]
pub struct PendingChanges {
    changes: Mutex<Vec<PendingChange>>,
}

impl PendingChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, change: PendingChange) {
        self.changes.lock().await.push(change);
    }

    /// Removes and returns every pending change, leaving the buffer empty.
    pub async fn take(&self) -> Vec<PendingChange> {
        std::mem::take(&mut *self.changes.lock().await)
    }

    pub async fn len(&self) -> usize {
        self.changes.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.changes.lock().await.is_empty()
    }
}
