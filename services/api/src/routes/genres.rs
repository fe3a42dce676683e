//! Genre endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use crate::{
    error::ApiError,
    models::{CreateGenreRequest, GenreResponse, SearchQuery},
    permissions::{AuthUser, can_mutate_catalog},
    state::AppState,
    validation::validate_slug,
};

/// List genres, optionally filtered by `?search=`
pub async fn list_genres(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let genres = state
        .genre_repository
        .list(query.search.as_deref())
        .await
        .map_err(|e| {
            error!("Failed to list genres: {}", e);
            ApiError::InternalServerError
        })?;

    let response: Vec<GenreResponse> = genres.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

/// Create a genre (admin only)
pub async fn create_genre(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateGenreRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_mutate_catalog(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    if payload.name.is_empty() {
        return Err(ApiError::validation("name", "Name is required"));
    }
    validate_slug(&payload.slug).map_err(|e| ApiError::validation("slug", e))?;

    let existing = state
        .genre_repository
        .find_by_slug(&payload.slug)
        .await
        .map_err(|e| {
            error!("Failed to look up genre slug: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::Conflict(format!(
            "Genre slug '{}' is already taken",
            payload.slug
        )));
    }

    let genre = state
        .genre_repository
        .create(&payload.name, &payload.slug)
        .await
        .map_err(|e| {
            ApiError::conflict_or_internal(
                e,
                format!("Genre slug '{}' is already taken", payload.slug),
            )
        })?;

    Ok((StatusCode::CREATED, Json(GenreResponse::from(genre))))
}

/// Delete a genre by slug (admin only)
pub async fn delete_genre(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_mutate_catalog(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    let deleted = state
        .genre_repository
        .delete_by_slug(&slug)
        .await
        .map_err(|e| {
            error!("Failed to delete genre: {}", e);
            ApiError::InternalServerError
        })?;

    if !deleted {
        return Err(ApiError::NotFound("Genre"));
    }

    Ok(StatusCode::NO_CONTENT)
}
