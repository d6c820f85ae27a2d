use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::EntityId;
use domain::{
    Aggregate, CatalogStore, Category, CategoryRepository, Genre, GenreRepository, Repository,
    SearchInput, SearchOutput, Session, UnitOfWork, repository,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use crate::query::{CATEGORY_COLUMNS, GENRE_COLUMNS, SearchQuery};
use crate::{PendingChange, PendingChanges, Result, StoreError};

/// PostgreSQL-backed catalog store.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new PostgreSQL catalog over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Opens a session with direct access to its repositories.
    pub fn open_session(&self) -> Arc<PostgresSession> {
        Arc::new(PostgresSession {
            pool: self.pool.clone(),
            pending: PendingChanges::new(),
        })
    }
}

impl CatalogStore for PostgresCatalog {
    fn session(&self) -> Session {
        let session = self.open_session();
        Session::new(session.clone(), session.clone(), session)
    }
}

/// Per-request view of a [`PostgresCatalog`].
///
/// Reads go straight to the pool. Writes are buffered and run inside one
/// transaction on commit.
pub struct PostgresSession {
    pool: PgPool,
    pending: PendingChanges,
}

impl PostgresSession {
    fn row_to_category(row: PgRow) -> Result<Category> {
        Ok(Category::restore(
            EntityId::from_uuid(row.try_get::<Uuid, _>("id")?),
            row.try_get("name")?,
            row.try_get("description")?,
            row.try_get("is_active")?,
            row.try_get("created_at")?,
        ))
    }

    fn row_to_genre(row: PgRow, categories: Vec<EntityId>) -> Result<Genre> {
        Ok(Genre::restore(
            EntityId::from_uuid(row.try_get::<Uuid, _>("id")?),
            row.try_get("name")?,
            row.try_get("is_active")?,
            row.try_get("created_at")?,
            categories,
        ))
    }

    async fn fetch_category(&self, id: EntityId) -> Result<Category> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Self::row_to_category(row),
            None => Err(not_found::<Category>(id)),
        }
    }

    async fn search_categories(&self, input: &SearchInput) -> Result<SearchOutput<Category>> {
        let query = SearchQuery::categories(input);
        let total = self.count(&query).await?;

        let page_sql = query.page_sql();
        let mut page = sqlx::query(&page_sql);
        if let Some(filter) = query.filter() {
            page = page.bind(filter);
        }
        let rows = page
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(Self::row_to_category)
            .collect::<Result<Vec<_>>>()?;
        Ok(SearchOutput::new(input, total, items))
    }

    async fn existing_category_ids(&self, ids: &[EntityId]) -> Result<Vec<EntityId>> {
        let requested: Vec<Uuid> = ids.iter().map(|id| id.as_uuid()).collect();
        let found: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ANY($1)")
            .bind(&requested)
            .fetch_all(&self.pool)
            .await?;

        // Keep the caller's order and drop repeats.
        let mut existing = Vec::with_capacity(found.len());
        for id in requested {
            if found.contains(&id) && !existing.contains(&EntityId::from_uuid(id)) {
                existing.push(EntityId::from_uuid(id));
            }
        }
        Ok(existing)
    }

    async fn fetch_genre(&self, id: EntityId) -> Result<Genre> {
        let row: Option<PgRow> = sqlx::query(&format!(
            "SELECT {GENRE_COLUMNS} FROM genres WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Err(not_found::<Genre>(id));
        };

        let categories: Vec<Uuid> = sqlx::query_scalar(
            "SELECT category_id FROM genres_categories WHERE genre_id = $1 ORDER BY position",
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Self::row_to_genre(
            row,
            categories.into_iter().map(EntityId::from_uuid).collect(),
        )
    }

    async fn search_genres(&self, input: &SearchInput) -> Result<SearchOutput<Genre>> {
        let query = SearchQuery::genres(input);
        let total = self.count(&query).await?;

        let page_sql = query.page_sql();
        let mut page = sqlx::query(&page_sql);
        if let Some(filter) = query.filter() {
            page = page.bind(filter);
        }
        let rows = page
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows
            .iter()
            .map(|row| row.try_get::<Uuid, _>("id"))
            .collect::<std::result::Result<_, _>>()?;

        // One round trip for the links of the whole page.
        let links = sqlx::query(
            r#"
            SELECT genre_id, category_id
            FROM genres_categories
            WHERE genre_id = ANY($1)
            ORDER BY genre_id, position
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut categories: HashMap<Uuid, Vec<EntityId>> = HashMap::new();
        for link in links {
            let genre_id: Uuid = link.try_get("genre_id")?;
            let category_id: Uuid = link.try_get("category_id")?;
            categories
                .entry(genre_id)
                .or_default()
                .push(EntityId::from_uuid(category_id));
        }

        let items = rows
            .into_iter()
            .zip(ids)
            .map(|(row, id)| {
                Self::row_to_genre(row, categories.remove(&id).unwrap_or_default())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(SearchOutput::new(input, total, items))
    }

    async fn count(&self, query: &SearchQuery<'_>) -> Result<u64> {
        let count_sql = query.count_sql();
        let mut count = sqlx::query_scalar(&count_sql);
        if let Some(filter) = query.filter() {
            count = count.bind(filter);
        }
        let total: i64 = count.fetch_one(&self.pool).await?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn apply_all(&self, changes: &[PendingChange]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for change in changes {
            apply(&mut *tx, change).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

fn not_found<A: Aggregate>(id: EntityId) -> StoreError {
    StoreError::NotFound {
        entity_type: A::ENTITY_TYPE,
        id,
    }
}

/// Turns a zero row count into `NotFound`.
fn expect_row<A: Aggregate>(rows_affected: u64, id: EntityId) -> Result<()> {
    if rows_affected == 0 {
        return Err(not_found::<A>(id));
    }
    Ok(())
}

async fn apply(conn: &mut PgConnection, change: &PendingChange) -> Result<()> {
    match change {
        PendingChange::InsertCategory(category) => {
            sqlx::query(
                r#"
                INSERT INTO categories (id, name, description, is_active, created_at)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(category.id().as_uuid())
            .bind(category.name())
            .bind(category.description())
            .bind(category.is_active())
            .bind(category.created_at())
            .execute(&mut *conn)
            .await
            .map_err(|e| duplicate_or_database::<Category>(e, category.id()))?;
        }
        PendingChange::UpdateCategory(category) => {
            let result = sqlx::query(
                r#"
                UPDATE categories
                SET name = $2, description = $3, is_active = $4
                WHERE id = $1
                "#,
            )
            .bind(category.id().as_uuid())
            .bind(category.name())
            .bind(category.description())
            .bind(category.is_active())
            .execute(&mut *conn)
            .await?;
            expect_row::<Category>(result.rows_affected(), category.id())?;
        }
        PendingChange::DeleteCategory(id) => {
            let result = sqlx::query("DELETE FROM categories WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&mut *conn)
                .await?;
            expect_row::<Category>(result.rows_affected(), *id)?;
        }
        PendingChange::InsertGenre(genre) => {
            sqlx::query(
                r#"
                INSERT INTO genres (id, name, is_active, created_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(genre.id().as_uuid())
            .bind(genre.name())
            .bind(genre.is_active())
            .bind(genre.created_at())
            .execute(&mut *conn)
            .await
            .map_err(|e| duplicate_or_database::<Genre>(e, genre.id()))?;
            insert_links(conn, genre).await?;
        }
        PendingChange::UpdateGenre(genre) => {
            let result = sqlx::query(
                r#"
                UPDATE genres
                SET name = $2, is_active = $3
                WHERE id = $1
                "#,
            )
            .bind(genre.id().as_uuid())
            .bind(genre.name())
            .bind(genre.is_active())
            .execute(&mut *conn)
            .await?;
            expect_row::<Genre>(result.rows_affected(), genre.id())?;

            sqlx::query("DELETE FROM genres_categories WHERE genre_id = $1")
                .bind(genre.id().as_uuid())
                .execute(&mut *conn)
                .await?;
            insert_links(conn, genre).await?;
        }
        PendingChange::DeleteGenre(id) => {
            let result = sqlx::query("DELETE FROM genres WHERE id = $1")
                .bind(id.as_uuid())
                .execute(&mut *conn)
                .await?;
            expect_row::<Genre>(result.rows_affected(), *id)?;
        }
    }
    Ok(())
}

async fn insert_links(conn: &mut PgConnection, genre: &Genre) -> Result<()> {
    if genre.categories().is_empty() {
        return Ok(());
    }
    let category_ids: Vec<Uuid> = genre.categories().iter().map(|id| id.as_uuid()).collect();

    sqlx::query(
        r#"
        INSERT INTO genres_categories (genre_id, category_id, position)
        SELECT $1, link.category_id, (link.ordinal - 1)::int
        FROM unnest($2::uuid[]) WITH ORDINALITY AS link(category_id, ordinal)
        "#,
    )
    .bind(genre.id().as_uuid())
    .bind(&category_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

fn duplicate_or_database<A: Aggregate>(err: sqlx::Error, id: EntityId) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err
        && db_err.is_unique_violation()
    {
        return StoreError::Duplicate {
            entity_type: A::ENTITY_TYPE,
            id,
        };
    }
    StoreError::Database(err)
}

#[async_trait]
impl Repository<Category> for PostgresSession {
    async fn insert(&self, category: &Category) -> repository::Result<()> {
        self.pending
            .push(PendingChange::InsertCategory(category.clone()))
            .await;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: EntityId) -> repository::Result<Category> {
        Ok(self.fetch_category(id).await?)
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

    #[tracing::instrument(skip(self))]
    async fn search(&self, input: &SearchInput) -> repository::Result<SearchOutput<Category>> {
        Ok(self.search_categories(input).await?)
    }
}

#[async_trait]
impl CategoryRepository for PostgresSession {
    #[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
    async fn get_ids_list_by_ids(&self, ids: &[EntityId]) -> repository::Result<Vec<EntityId>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.existing_category_ids(ids).await?)
    }
}

#[async_trait]
impl Repository<Genre> for PostgresSession {
    async fn insert(&self, genre: &Genre) -> repository::Result<()> {
        self.pending
            .push(PendingChange::InsertGenre(genre.clone()))
            .await;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: EntityId) -> repository::Result<Genre> {
        Ok(self.fetch_genre(id).await?)
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

    #[tracing::instrument(skip(self))]
    async fn search(&self, input: &SearchInput) -> repository::Result<SearchOutput<Genre>> {
        Ok(self.search_genres(input).await?)
    }
}

impl GenreRepository for PostgresSession {}

#[async_trait]
impl UnitOfWork for PostgresSession {
    #[tracing::instrument(skip(self))]
    async fn commit(&self) -> repository::Result<()> {
        let changes = self.pending.take().await;
        if changes.is_empty() {
            return Ok(());
        }

        // A dropped transaction rolls back, so an error here persists nothing.
        self.apply_all(&changes).await?;

        metrics::counter!("catalog_store_commits_total", "store" => "postgres").increment(1);
        tracing::debug!(changes = changes.len(), "committed transaction");
        Ok(())
    }

    async fn rollback(&self) -> repository::Result<()> {
        let discarded = self.pending.take().await.len();
        tracing::debug!(discarded, "rolled back pending changes");
        Ok(())
    }
}
