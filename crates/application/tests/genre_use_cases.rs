use application::{
    ApplicationError, CreateCategory, CreateCategoryInput, CreateGenre, CreateGenreInput,
    DeleteCategory, DeleteGenre, GetGenre, ListGenres, ListInput, UpdateGenre, UpdateGenreInput,
    UseCase,
};
use catalog_store::InMemoryCatalog;
use common::EntityId;
use domain::CatalogStore;
use tokio_util::sync::CancellationToken;

async fn category(catalog: &InMemoryCatalog, name: &str) -> EntityId {
    CreateCategory::from_session(&catalog.session())
        .execute(
            CreateCategoryInput::new(name, "", true),
            &CancellationToken::new(),
        )
        .await
        .unwrap()
        .id
}

async fn create_genre(
    catalog: &InMemoryCatalog,
    input: CreateGenreInput,
) -> Result<application::GenreModelOutput, ApplicationError> {
    CreateGenre::from_session(&catalog.session())
        .execute(input, &CancellationToken::new())
        .await
}

#[tokio::test]
async fn create_genre_without_categories() {
    let catalog = InMemoryCatalog::new();

    let output = create_genre(&catalog, CreateGenreInput::new("Horror", false))
        .await
        .unwrap();

    assert_eq!(output.name, "Horror");
    assert!(!output.is_active);
    assert!(output.categories.is_empty());
    assert_eq!(catalog.genre_count().await, 1);
}

#[tokio::test]
async fn create_genre_with_existing_categories_keeps_order() {
    let catalog = InMemoryCatalog::new();
    let action = category(&catalog, "Action").await;
    let drama = category(&catalog, "Drama").await;

    let output = create_genre(
        &catalog,
        CreateGenreInput::new("Mixed", true).categories_ids(vec![drama, action]),
    )
    .await
    .unwrap();
    assert_eq!(output.categories, vec![drama, action]);

    let stored = GetGenre::from_session(&catalog.session())
        .execute(output.id, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(stored, output);
}

#[tokio::test]
async fn create_genre_with_missing_category_fails_entirely() {
    let catalog = InMemoryCatalog::new();
    let a = category(&catalog, "Action").await;
    let b = category(&catalog, "Drama").await;
    let missing = EntityId::new();

    let err = create_genre(
        &catalog,
        CreateGenreInput::new("Mixed", true).categories_ids(vec![a, missing, b]),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApplicationError::RelatedAggregate(_)));
    assert_eq!(
        err.to_string(),
        format!("Related category id (or ids) not found: '{missing}'")
    );
    assert_eq!(catalog.genre_count().await, 0);
}

#[tokio::test]
async fn missing_ids_are_listed_in_input_order() {
    let catalog = InMemoryCatalog::new();
    let first = EntityId::new();
    let second = EntityId::new();

    let err = create_genre(
        &catalog,
        CreateGenreInput::new("Mixed", true).categories_ids(vec![first, second]),
    )
    .await
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("Related category id (or ids) not found: '{first}, {second}'")
    );
}

#[tokio::test]
async fn create_genre_with_blank_name_fails() {
    let catalog = InMemoryCatalog::new();

    let err = create_genre(&catalog, CreateGenreInput::new("  ", true))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Name should not be empty or null");
}

#[tokio::test]
async fn update_genre_replaces_categories_and_status() {
    let catalog = InMemoryCatalog::new();
    let action = category(&catalog, "Action").await;
    let drama = category(&catalog, "Drama").await;
    let genre = create_genre(
        &catalog,
        CreateGenreInput::new("Mixed", true).categories_ids(vec![action]),
    )
    .await
    .unwrap();

    let updated = UpdateGenre::from_session(&catalog.session())
        .execute(
            UpdateGenreInput::new(genre.id, "Renamed")
                .is_active(false)
                .categories_ids(vec![drama]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert!(!updated.is_active);
    assert_eq!(updated.categories, vec![drama]);
    assert_eq!(updated.created_at, genre.created_at);
}

#[tokio::test]
async fn update_genre_without_list_keeps_categories() {
    let catalog = InMemoryCatalog::new();
    let action = category(&catalog, "Action").await;
    let genre = create_genre(
        &catalog,
        CreateGenreInput::new("Mixed", true).categories_ids(vec![action]),
    )
    .await
    .unwrap();

    let updated = UpdateGenre::from_session(&catalog.session())
        .execute(
            UpdateGenreInput::new(genre.id, "Renamed"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(updated.categories, vec![action]);
    assert!(updated.is_active);
}

#[tokio::test]
async fn update_genre_with_missing_category_leaves_it_unchanged() {
    let catalog = InMemoryCatalog::new();
    let genre = create_genre(&catalog, CreateGenreInput::new("Mixed", true))
        .await
        .unwrap();
    let missing = EntityId::new();

    let err = UpdateGenre::from_session(&catalog.session())
        .execute(
            UpdateGenreInput::new(genre.id, "Renamed").categories_ids(vec![missing]),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::RelatedAggregate(_)));

    let stored = GetGenre::from_session(&catalog.session())
        .execute(genre.id, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(stored.name, "Mixed");
}

#[tokio::test]
async fn deleting_category_drops_it_from_genre() {
    let catalog = InMemoryCatalog::new();
    let action = category(&catalog, "Action").await;
    let drama = category(&catalog, "Drama").await;
    let genre = create_genre(
        &catalog,
        CreateGenreInput::new("Mixed", true).categories_ids(vec![action, drama]),
    )
    .await
    .unwrap();

    DeleteCategory::from_session(&catalog.session())
        .execute(action, &CancellationToken::new())
        .await
        .unwrap();

    let stored = GetGenre::from_session(&catalog.session())
        .execute(genre.id, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(stored.categories, vec![drama]);
}

#[tokio::test]
async fn delete_genre_then_get_is_not_found() {
    let catalog = InMemoryCatalog::new();
    let genre = create_genre(&catalog, CreateGenreInput::new("Horror", true))
        .await
        .unwrap();

    DeleteGenre::from_session(&catalog.session())
        .execute(genre.id, &CancellationToken::new())
        .await
        .unwrap();

    let err = GetGenre::from_session(&catalog.session())
        .execute(genre.id, &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), format!("Genre '{}' not found.", genre.id));
}

#[tokio::test]
async fn list_genres_filters_by_name() {
    let catalog = InMemoryCatalog::new();
    for name in ["Horror", "Comedy", "Horror Comedy"] {
        create_genre(&catalog, CreateGenreInput::new(name, true))
            .await
            .unwrap();
    }

    let output = ListGenres::from_session(&catalog.session())
        .execute(
            ListInput {
                search: "Comedy".to_string(),
                ..ListInput::new()
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(output.total, 2);
    let names: Vec<&str> = output.items.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Comedy", "Horror Comedy"]);
}
