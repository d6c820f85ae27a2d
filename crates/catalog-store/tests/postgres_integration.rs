//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p catalog-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use catalog_store::PostgresCatalog;
use common::EntityId;
use domain::{
    Aggregate, CatalogStore, Category, Genre, RepositoryError, SearchInput, SearchOrder, SortField,
};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresCatalog::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh catalog with its own pool and cleared tables
async fn get_test_catalog() -> PostgresCatalog {
    let info = get_container_info().await;
    let catalog = PostgresCatalog::connect(&info.connection_string, 5)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE genres_categories, genres, categories")
        .execute(catalog.pool())
        .await
        .unwrap();

    catalog
}

fn category(name: &str) -> Category {
    Category::new(name, Some(format!("{name} description")), true).unwrap()
}

async fn seed_categories(catalog: &PostgresCatalog, names: &[&str]) -> Vec<Category> {
    let session = catalog.session();
    let repo = session.categories();
    let mut created = Vec::new();
    for name in names {
        let c = category(name);
        repo.insert(&c).await.unwrap();
        created.push(c);
    }
    session.unit_of_work().commit().await.unwrap();
    created
}

#[tokio::test]
async fn insert_commit_and_get_category() {
    let catalog = get_test_catalog().await;
    let session = catalog.session();
    let c = Category::new("Documentary", Some("Real stories".to_string()), false).unwrap();

    session.categories().insert(&c).await.unwrap();
    assert!(session.categories().get(c.id()).await.is_err());

    session.unit_of_work().commit().await.unwrap();

    let stored = catalog.session().categories().get(c.id()).await.unwrap();
    assert_eq!(stored, c);
}

#[tokio::test]
async fn boundary_lengths_round_trip() {
    let catalog = get_test_catalog().await;
    let session = catalog.session();
    let long = Category::new("n".repeat(255), Some("d".repeat(10_000)), true).unwrap();
    let short = Category::new("abc", Some(String::new()), true).unwrap();

    session.categories().insert(&long).await.unwrap();
    session.categories().insert(&short).await.unwrap();
    session.unit_of_work().commit().await.unwrap();

    let repo = catalog.session().categories();
    assert_eq!(repo.get(long.id()).await.unwrap(), long);
    assert_eq!(repo.get(short.id()).await.unwrap(), short);
}

#[tokio::test]
async fn rollback_persists_nothing() {
    let catalog = get_test_catalog().await;
    let session = catalog.session();

    session.categories().insert(&category("Action")).await.unwrap();
    session.unit_of_work().rollback().await.unwrap();
    session.unit_of_work().commit().await.unwrap();

    let output = session.categories().search(&SearchInput::new()).await.unwrap();
    assert_eq!(output.total, 0);
}

#[tokio::test]
async fn update_and_delete() {
    let catalog = get_test_catalog().await;
    let mut c = seed_categories(&catalog, &["Comedy"]).await.remove(0);

    let session = catalog.session();
    c.update("Satire", None).unwrap();
    c.deactivate();
    session.categories().update(&c).await.unwrap();
    session.unit_of_work().commit().await.unwrap();

    let stored = session.categories().get(c.id()).await.unwrap();
    assert_eq!(stored.name(), "Satire");
    assert_eq!(stored.description(), "Comedy description");
    assert!(!stored.is_active());

    session.categories().delete(&stored).await.unwrap();
    session.unit_of_work().commit().await.unwrap();

    let err = session.categories().get(c.id()).await.unwrap_err();
    assert_eq!(err.to_string(), format!("Category '{}' not found.", c.id()));
}

#[tokio::test]
async fn update_of_vanished_row_is_not_found_and_rolls_back() {
    let catalog = get_test_catalog().await;
    let session = catalog.session();
    let fresh = category("Fresh");
    let ghost = category("Ghost");

    session.categories().insert(&fresh).await.unwrap();
    session.categories().update(&ghost).await.unwrap();
    let err = session.unit_of_work().commit().await.unwrap_err();

    assert!(matches!(err, RepositoryError::NotFound { id, .. } if id == ghost.id()));
    assert!(session.categories().get(fresh.id()).await.is_err());
}

#[tokio::test]
async fn search_filters_case_sensitively() {
    let catalog = get_test_catalog().await;
    seed_categories(
        &catalog,
        &[
            "Action",
            "Horror",
            "Horror - based on real facts",
            "Drama",
            "horror lowercase",
        ],
    )
    .await;

    let repo = catalog.session().categories();
    let output = repo
        .search(&SearchInput::new().search("Horror").per_page(1).page(2))
        .await
        .unwrap();

    assert_eq!(output.total, 2);
    assert_eq!(output.current_page, 2);
    assert_eq!(output.items.len(), 1);
    assert_eq!(output.items[0].name(), "Horror - based on real facts");
}

#[tokio::test]
async fn search_pages_seven_items_by_five() {
    let catalog = get_test_catalog().await;
    seed_categories(&catalog, &["Aaa", "Bbb", "Ccc", "Ddd", "Eee", "Fff", "Ggg"]).await;
    let repo = catalog.session().categories();

    let first = repo
        .search(&SearchInput::new().per_page(5))
        .await
        .unwrap();
    let second = repo
        .search(&SearchInput::new().per_page(5).page(2))
        .await
        .unwrap();
    let third = repo
        .search(&SearchInput::new().per_page(5).page(3))
        .await
        .unwrap();

    assert_eq!(first.items.len(), 5);
    assert_eq!(second.items.len(), 2);
    assert!(third.items.is_empty());
    assert_eq!(third.total, 7);
    assert_eq!(second.items[1].name(), "Ggg");
}

#[tokio::test]
async fn search_orders_match_in_memory_semantics() {
    let catalog = get_test_catalog().await;
    seed_categories(&catalog, &["beta", "Beta", "Alpha", "alpha"]).await;
    let repo = catalog.session().categories();

    let by_name = repo
        .search(&SearchInput::new().sort(SortField::Name))
        .await
        .unwrap();
    let names: Vec<&str> = by_name.items.iter().map(|c| c.name()).collect();
    // byte order: uppercase before lowercase
    assert_eq!(names, vec!["Alpha", "Beta", "alpha", "beta"]);

    let by_id = repo
        .search(&SearchInput::new().sort(SortField::Id).dir(SearchOrder::Desc))
        .await
        .unwrap();
    assert!(by_id.items.windows(2).all(|w| w[0].id() > w[1].id()));

    let by_created = repo
        .search(&SearchInput::new().sort(SortField::CreatedAt))
        .await
        .unwrap();
    assert!(
        by_created
            .items
            .windows(2)
            .all(|w| w[0].created_at() <= w[1].created_at())
    );
}

#[tokio::test]
async fn get_ids_list_by_ids_returns_existing_subset() {
    let catalog = get_test_catalog().await;
    let created = seed_categories(&catalog, &["Action", "Drama"]).await;
    let missing = EntityId::new();

    let found = catalog
        .session()
        .categories()
        .get_ids_list_by_ids(&[created[0].id(), missing, created[1].id()])
        .await
        .unwrap();

    assert_eq!(found, vec![created[0].id(), created[1].id()]);
}

#[tokio::test]
async fn genre_keeps_category_order() {
    let catalog = get_test_catalog().await;
    let created = seed_categories(&catalog, &["Action", "Drama", "Comedy"]).await;

    let mut genre = Genre::new("Mixed", true).unwrap();
    for c in created.iter().rev() {
        genre.add_category(c.id()).unwrap();
    }

    let session = catalog.session();
    session.genres().insert(&genre).await.unwrap();
    session.unit_of_work().commit().await.unwrap();

    let stored = session.genres().get(genre.id()).await.unwrap();
    assert_eq!(stored, genre);

    let page = session.genres().search(&SearchInput::new()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].categories(), genre.categories());
}

#[tokio::test]
async fn genre_update_replaces_links() {
    let catalog = get_test_catalog().await;
    let created = seed_categories(&catalog, &["Action", "Drama"]).await;

    let mut genre = Genre::new("Mixed", false).unwrap();
    genre.add_category(created[0].id()).unwrap();
    let session = catalog.session();
    session.genres().insert(&genre).await.unwrap();
    session.unit_of_work().commit().await.unwrap();

    genre.remove_all_categories().unwrap();
    genre.add_category(created[1].id()).unwrap();
    genre.update("Renamed").unwrap();
    genre.activate();
    session.genres().update(&genre).await.unwrap();
    session.unit_of_work().commit().await.unwrap();

    let stored = session.genres().get(genre.id()).await.unwrap();
    assert_eq!(stored.name(), "Renamed");
    assert!(stored.is_active());
    assert_eq!(stored.categories(), &[created[1].id()]);
}

#[tokio::test]
async fn deleting_genre_removes_its_links() {
    let catalog = get_test_catalog().await;
    let created = seed_categories(&catalog, &["Action"]).await;

    let mut genre = Genre::new("Solo", true).unwrap();
    genre.add_category(created[0].id()).unwrap();
    let session = catalog.session();
    session.genres().insert(&genre).await.unwrap();
    session.unit_of_work().commit().await.unwrap();

    session.genres().delete(&genre).await.unwrap();
    session.unit_of_work().commit().await.unwrap();

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genres_categories")
        .fetch_one(catalog.pool())
        .await
        .unwrap();
    assert_eq!(links, 0);
    assert!(session.categories().get(created[0].id()).await.is_ok());
}
