//! Category CRUD and listing endpoints.

use application::{
    CategoryModelOutput, CreateCategory, CreateCategoryInput, DeleteCategory, GetCategory,
    ListCategories, ListInput, UpdateCategory, UpdateCategoryInput, UseCase,
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

fn empty_description() -> Option<String> {
    Some(String::new())
}

/// Body of `POST /categories`.
///
/// An omitted description is empty; an explicit `null` is kept as `None` so
/// it fails validation.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "empty_description")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl From<CreateCategoryRequest> for CreateCategoryInput {
    fn from(req: CreateCategoryRequest) -> Self {
        CreateCategoryInput {
            name: req.name.unwrap_or_default(),
            description: req.description,
            is_active: req.is_active.unwrap_or(true),
        }
    }
}

/// Body of `PUT /categories/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

// -- Handlers --

/// POST /categories: create a category.
#[tracing::instrument(skip(state, req))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.store.session();
    let output = CreateCategory::from_session(&session)
        .execute(req.into(), &state.request_token())
        .await?;

    let location = format!("/categories/{}", output.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(output),
    ))
}

/// GET /categories/{id}: load one category.
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<Json<CategoryModelOutput>, ApiError> {
    let session = state.store.session();
    let output = GetCategory::from_session(&session)
        .execute(id, &state.request_token())
        .await?;
    Ok(Json(output))
}

/// PUT /categories/{id}: replace name, and optionally description and status.
#[tracing::instrument(skip(state, req))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
    ApiJson(req): ApiJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryModelOutput>, ApiError> {
    let input = UpdateCategoryInput {
        id,
        name: req.name.unwrap_or_default(),
        description: req.description,
        is_active: req.is_active,
    };

    let session = state.store.session();
    let output = UpdateCategory::from_session(&session)
        .execute(input, &state.request_token())
        .await?;
    Ok(Json(output))
}

/// DELETE /categories/{id}: remove a category.
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<EntityId>,
) -> Result<StatusCode, ApiError> {
    let session = state.store.session();
    DeleteCategory::from_session(&session)
        .execute(id, &state.request_token())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /categories: filtered, sorted, paged listing.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<ApiResponseList<CategoryModelOutput>>, ApiError> {
    let input = ListInput::try_from(query)?;

    let session = state.store.session();
    let output = ListCategories::from_session(&session)
        .execute(input, &state.request_token())
        .await?;
    Ok(Json(output.into()))
}
