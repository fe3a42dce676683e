//! Category endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use crate::{
    error::ApiError,
    models::{CategoryResponse, CreateCategoryRequest, SearchQuery},
    permissions::{AuthUser, can_mutate_catalog},
    state::AppState,
    validation::validate_slug,
};

/// List categories, optionally filtered by `?search=`
pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let categories = state
        .category_repository
        .list(query.search.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to list categories: {}", e);
            ApiError::InternalServerError
        })?;

    let response: Vec<CategoryResponse> = categories.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

/// Create a category (admin only)
pub async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_mutate_catalog(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    if payload.name.is_empty() {
        return Err(ApiError::validation("name", "Name is required"));
    }
    validate_slug(&payload.slug).map_err(|e| ApiError::validation("slug", e))?;

    let existing = state
        .category_repository
        .find_by_slug(&payload.slug)
        .await
        .map_err(|e| {
            error!("Failed to look up category slug: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::Conflict(format!(
            "Category slug '{}' is already taken",
            payload.slug
        )));
    }

    let category = state
        .category_repository
        .create(&payload.name, &payload.slug)
        .await
        .map_err(|e| {
            ApiError::conflict_or_internal(
                e,
                format!("Category slug '{}' is already taken", payload.slug),
            )
        })?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}

/// Delete a category by slug (admin only)
pub async fn delete_category(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_mutate_catalog(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    let deleted = state
        .category_repository
        .delete_by_slug(&slug)
        .await
        .map_err(|e| {
            error!("Failed to delete category: {}", e);
            ApiError::InternalServerError
        })?;

    if !deleted {
        return Err(ApiError::NotFound("Category"));
    }

    Ok(StatusCode::NO_CONTENT)
}
