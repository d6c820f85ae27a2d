use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{
    Aggregate, CatalogStore, Category, CategoryRepository, Genre, GenreRepository, Repository,
    RepositoryError, SearchInput, SearchOutput, Session, UnitOfWork, repository,
};
use tokio::sync::RwLock;

use crate::{PendingChange, PendingChanges, StoreError};

#[derive(Debug, Default)]
struct CatalogState {
    categories: HashMap<EntityId, Category>,
    genres: HashMap<EntityId, Genre>,
}

impl CatalogState {
    /// Checks a batch against committed state as it would evolve change by
    /// change, so `apply` can run without failing halfway.
    fn check(&self, changes: &[PendingChange]) -> crate::Result<()> {
        let mut categories = Overlay::new(&self.categories);
        let mut genres = Overlay::new(&self.genres);

        for change in changes {
            match change {
                PendingChange::InsertCategory(category) => {
                    if categories.contains(category.id()) {
                        return Err(duplicate::<Category>(category.id()));
                    }
                    categories.set(category.id(), true);
                }
                PendingChange::UpdateCategory(category) => {
                    if !categories.contains(category.id()) {
                        return Err(not_found::<Category>(category.id()));
                    }
                }
                PendingChange::DeleteCategory(id) => {
                    if !categories.contains(*id) {
                        return Err(not_found::<Category>(*id));
                    }
                    categories.set(*id, false);
                }
                PendingChange::InsertGenre(genre) => {
                    if genres.contains(genre.id()) {
                        return Err(duplicate::<Genre>(genre.id()));
                    }
                    check_links(genre, &categories)?;
                    genres.set(genre.id(), true);
                }
                PendingChange::UpdateGenre(genre) => {
                    if !genres.contains(genre.id()) {
                        return Err(not_found::<Genre>(genre.id()));
                    }
                    check_links(genre, &categories)?;
                }
                PendingChange::DeleteGenre(id) => {
                    if !genres.contains(*id) {
                        return Err(not_found::<Genre>(*id));
                    }
                    genres.set(*id, false);
                }
            }
        }
        Ok(())
    }

    /// Applies a change that already passed [`CatalogState::check`].
    fn apply(&mut self, change: PendingChange) {
        match change {
            PendingChange::InsertCategory(category) | PendingChange::UpdateCategory(category) => {
                self.categories.insert(category.id(), category);
            }
            PendingChange::DeleteCategory(id) => {
                self.categories.remove(&id);
                // Mirrors the cascading foreign key on genres_categories.
                for genre in self.genres.values_mut() {
                    if genre.categories().contains(&id) {
                        let kept = genre
                            .categories()
                            .iter()
                            .copied()
                            .filter(|c| *c != id)
                            .collect();
                        *genre = Genre::restore(
                            genre.id(),
                            genre.name().to_string(),
                            genre.is_active(),
                            genre.created_at(),
                            kept,
                        );
                    }
                }
            }
            PendingChange::InsertGenre(genre) | PendingChange::UpdateGenre(genre) => {
                self.genres.insert(genre.id(), genre);
            }
            PendingChange::DeleteGenre(id) => {
                self.genres.remove(&id);
            }
        }
    }
}

/// Row existence during a batch: uncommitted inserts and deletes layered
/// over the committed map.
struct Overlay<'a, V> {
    committed: &'a HashMap<EntityId, V>,
    changed: HashMap<EntityId, bool>,
}

impl<'a, V> Overlay<'a, V> {
    fn new(committed: &'a HashMap<EntityId, V>) -> Self {
        Self {
            committed,
            changed: HashMap::new(),
        }
    }

    fn contains(&self, id: EntityId) -> bool {
        self.changed
            .get(&id)
            .copied()
            .unwrap_or_else(|| self.committed.contains_key(&id))
    }

    fn set(&mut self, id: EntityId, exists: bool) {
        self.changed.insert(id, exists);
    }
}

/// Same rule as the genres_categories foreign key.
fn check_links(genre: &Genre, categories: &Overlay<'_, Category>) -> crate::Result<()> {
    match genre.categories().iter().find(|id| !categories.contains(**id)) {
        Some(id) => Err(StoreError::MissingReference {
            entity_type: Category::ENTITY_TYPE,
            id: *id,
        }),
        None => Ok(()),
    }
}

fn not_found<A: Aggregate>(id: EntityId) -> StoreError {
    StoreError::NotFound {
        entity_type: A::ENTITY_TYPE,
        id,
    }
}

fn duplicate<A: Aggregate>(id: EntityId) -> StoreError {
    StoreError::Duplicate {
        entity_type: A::ENTITY_TYPE,
        id,
    }
}

/// Filters by name substring, orders, then pages a set of aggregates.
fn search_items<'a, A, I>(items: I, input: &SearchInput) -> SearchOutput<A>
where
    A: Aggregate + 'a,
    I: Iterator<Item = &'a A>,
{
    let mut matched: Vec<A> = items
        .filter(|a| !input.has_filter() || a.name().contains(input.search.as_str()))
        .cloned()
        .collect();
    let total = matched.len() as u64;

    matched.sort_by(input.sort.comparator(input.dir));

    let offset = usize::try_from(input.offset()).unwrap_or(usize::MAX);
    let page = matched
        .into_iter()
        .skip(offset)
        .take(input.per_page as usize)
        .collect();

    SearchOutput::new(input, total, page)
}

/// In-memory catalog store for testing and database-less runs.
///
/// Committed state lives behind a single lock; each session buffers its own
/// writes until commit.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    /// Creates a new empty in-memory catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session with direct access to its repositories.
    pub fn open_session(&self) -> Arc<InMemorySession> {
        Arc::new(InMemorySession {
            state: self.state.clone(),
            pending: PendingChanges::new(),
        })
    }

    pub async fn category_count(&self) -> usize {
        self.state.read().await.categories.len()
    }

    pub async fn genre_count(&self) -> usize {
        self.state.read().await.genres.len()
    }

}

impl CatalogStore for InMemoryCatalog {
    fn session(&self) -> Session {
        let session = self.open_session();
        Session::new(session.clone(), session.clone(), session)
    }
}

/// Per-request view of an [`InMemoryCatalog`].
pub struct InMemorySession {
    state: Arc<RwLock<CatalogState>>,
    pending: PendingChanges,
}

impl InMemorySession {
    /// Number of writes waiting for commit.
    pub async fn pending_count(&self) -> usize {
        self.pending.len().await
    }
}

#[async_trait]
impl Repository<Category> for InMemorySession {
    async fn insert(&self, category: &Category) -> repository::Result<()> {
        self.pending
            .push(PendingChange::InsertCategory(category.clone()))
            .await;
        Ok(())
    }

    async fn get(&self, id: EntityId) -> repository::Result<Category> {
        self.state
            .read()
            .await
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found::<Category>(id))
    }

    async fn update(&self, category: &Category) -> repository::Result<()> {
        self.pending
            .push(PendingChange::UpdateCategory(category.clone()))
            .await;
        Ok(())
    }

    async fn delete(&self, category: &Category) -> repository::Result<()> {
        self.pending
            .push(PendingChange::DeleteCategory(category.id()))
            .await;
        Ok(())
    }

    async fn search(&self, input: &SearchInput) -> repository::Result<SearchOutput<Category>> {
        let state = self.state.read().await;
        Ok(search_items(state.categories.values(), input))
    }
}

#[async_trait]
impl CategoryRepository for InMemorySession {
    async fn get_ids_list_by_ids(&self, ids: &[EntityId]) -> repository::Result<Vec<EntityId>> {
        let state = self.state.read().await;
        let mut found: Vec<EntityId> = Vec::with_capacity(ids.len());
        for id in ids {
            if state.categories.contains_key(id) && !found.contains(id) {
                found.push(*id);
            }
        }
        Ok(found)
    }
}

#[async_trait]
impl Repository<Genre> for InMemorySession {
    async fn insert(&self, genre: &Genre) -> repository::Result<()> {
        self.pending
            .push(PendingChange::InsertGenre(genre.clone()))
            .await;
        Ok(())
    }

    async fn get(&self, id: EntityId) -> repository::Result<Genre> {
        self.state
            .read()
            .await
            .genres
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found::<Genre>(id))
    }

    async fn update(&self, genre: &Genre) -> repository::Result<()> {
        self.pending
            .push(PendingChange::UpdateGenre(genre.clone()))
            .await;
        Ok(())
    }

    async fn delete(&self, genre: &Genre) -> repository::Result<()> {
        self.pending
            .push(PendingChange::DeleteGenre(genre.id()))
            .await;
        Ok(())
    }

    async fn search(&self, input: &SearchInput) -> repository::Result<SearchOutput<Genre>> {
        let state = self.state.read().await;
        Ok(search_items(state.genres.values(), input))
    }
}

impl GenreRepository for InMemorySession {}

#[async_trait]
impl UnitOfWork for InMemorySession {
    #[tracing::instrument(skip(self))]
    async fn commit(&self) -> repository::Result<()> {
        let changes = self.pending.take().await;
        if changes.is_empty() {
            return Ok(());
        }
        let count = changes.len();

        let mut state = self.state.write().await;
        state.check(&changes)?;
        for change in changes {
            state.apply(change);
        }

        metrics::counter!("catalog_store_commits_total", "store" => "memory").increment(1);
        tracing::debug!(changes = count, "committed in-memory changes");
        Ok(())
    }

    async fn rollback(&self) -> repository::Result<()> {
        let discarded = self.pending.take().await.len();
        tracing::debug!(discarded, "rolled back in-memory changes");
        Ok(())
    }
}
