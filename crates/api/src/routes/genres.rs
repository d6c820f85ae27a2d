//! Genre CRUD and listing endpoints.

use application::{
    CreateGenre, CreateGenreInput, DeleteGenre, GenreModelOutput, GetGenre, ListGenres,
    ListInput, UpdateGenre, UpdateGenreInput, UseCase,
};
use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use common::EntityId;
use serde::Deserialize;

use super::{ApiResponseList, ListQuery};
use crate::AppState;
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};

// -- Request types --

/// Body of both `POST /genres` and `PUT /genres/{id}`.
///
/// On update a missing `categories_ids` keeps the stored list; a present one,
/// even empty, replaces it.
#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub categories_ids: Option<Vec<EntityId>>,
}

// -- Handlers --

/// POST /genres: create a genre, optionally linked to categories.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateGenreInput {
        name: req.name.unwrap_or_default(),
        is_active: req.is_active.unwrap_or(true),
        categories_ids: req.categories_ids,
    };

    let session = state.store.session();
    let output = CreateGenre::from_session(&session)
        .execute(input, &state.request_token())
        .await?;

    let location = format!("/genres/{}", output.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(output),
    ))
}

/// GET /genres/{id}: load one genre with its category ids.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<GenreModelOutput>, ApiError> {
    let session = state.store.session();
    let output = GetGenre::from_session(&session)
        .execute(id, &state.request_token())
        .await?;
    Ok(Json(output))
}

/// PUT /genres/{id}: rename, and optionally change status and categories.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(req): ApiJson<GenreRequest>,
) -> Result<Json<GenreModelOutput>, ApiError> {
    let input = UpdateGenreInput {
        id,
        name: req.name.unwrap_or_default(),
        is_active: req.is_active,
        categories_ids: req.categories_ids,
    };

    let session = state.store.session();
    let output = UpdateGenre::from_session(&session)
        .execute(input, &state.request_token())
        .await?;
    Ok(Json(output))
}

/// DELETE /genres/{id}: remove a genre and its category links.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<StatusCode, ApiError> {
    let session = state.store.session();
    DeleteGenre::from_session(&session)
        .execute(id, &state.request_token())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /genres: filtered, sorted, paged listing.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponseList<GenreModelOutput>>, ApiError> {
    let input = ListInput::try_from(query)?;

    let session = state.store.session();
    let output = ListGenres::from_session(&session)
        .execute(input, &state.request_token())
        .await?;
    Ok(Json(output.into()))
}
