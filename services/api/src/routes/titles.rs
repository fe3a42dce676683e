//! Title endpoints

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateTitleRequest, TitleQuery, UpdateTitleRequest},
    permissions::{AuthUser, can_mutate_catalog},
    state::AppState,
    validation::validate_year,
};

/// List titles with computed ratings, filtered by query parameters
pub async fn list_titles(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let titles = state.title_repository.list(&query).await.map_err(|e| {
        error!("Failed to list titles: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(titles))
}

/// Get a title with its computed rating
pub async fn get_title(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let title = state
        .title_repository
        .get(title_id)
        .await
        .map_err(|e| {
            error!("Failed to get title: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Title"))?;

    Ok(Json(title))
}

/// Create a title (admin only)
pub async fn create_title(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateTitleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_mutate_catalog(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    if payload.name.is_empty() {
        return Err(ApiError::validation("name", "Name is required"));
    }
    validate_year(payload.year).map_err(|e| ApiError::validation("year", e))?;

    let category_id = match payload.category.as_deref() {
        Some(slug) => Some(resolve_category(&state, slug).await?),
        None => None,
    };
    let genre_ids = resolve_genres(&state, &payload.genre).await?;

    let id = state
        .title_repository
        .create(
            &payload.name,
            payload.year,
            payload.description.as_deref(),
            category_id,
            &genre_ids,
        )
        .await
        .map_err(|e| {
            error!("Failed to create title: {}", e);
            ApiError::InternalServerError
        })?;

    let title = state
        .title_repository
        .get(id)
        .await
        .map_err(|e| {
            error!("Failed to load created title: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::InternalServerError)?;

    Ok((StatusCode::CREATED, Json(title)))
}

/// Update a title (admin only)
pub async fn update_title(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(title_id): Path<Uuid>,
    Json(payload): Json<UpdateTitleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_mutate_catalog(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    if let Some(name) = payload.name.as_deref() {
        if name.is_empty() {
            return Err(ApiError::validation("name", "Name is required"));
        }
    }
    if let Some(year) = payload.year {
        validate_year(year).map_err(|e| ApiError::validation("year", e))?;
    }

    // An explicit null detaches the category; an absent field leaves it alone.
    let category_id = match &payload.category {
        Some(Some(slug)) => Some(Some(resolve_category(&state, slug).await?)),
        Some(None) => Some(None),
        None => None,
    };
    let genre_ids = match payload.genre.as_deref() {
        Some(slugs) => Some(resolve_genres(&state, slugs).await?),
        None => None,
    };

    let updated = state
        .title_repository
        .update(
            title_id,
            payload.name.as_deref(),
            payload.year,
            payload.description.as_ref().map(|d| d.as_deref()),
            category_id,
            genre_ids.as_deref(),
        )
        .await
        .map_err(|e| {
            error!("Failed to update title: {}", e);
            ApiError::InternalServerError
        })?;

    if !updated {
        return Err(ApiError::NotFound("Title"));
    }

    let title = state
        .title_repository
        .get(title_id)
        .await
        .map_err(|e| {
            error!("Failed to load updated title: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Title"))?;

    Ok(Json(title))
}

/// Delete a title (admin only)
pub async fn delete_title(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(title_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_mutate_catalog(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    let deleted = state.title_repository.delete(title_id).await.map_err(|e| {
        error!("Failed to delete title: {}", e);
        ApiError::InternalServerError
    })?;

    if !deleted {
        return Err(ApiError::NotFound("Title"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Resolve a category slug from the payload to its ID
async fn resolve_category(state: &AppState, slug: &str) -> Result<Uuid, ApiError> {
    let category = state
        .category_repository
        .find_by_slug(slug)
        .await
        .map_err(|e| {
            error!("Failed to resolve category slug: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::validation("category", format!("Unknown category '{slug}'")))?;

    Ok(category.id)
}

/// Resolve genre slugs from the payload to their IDs
async fn resolve_genres(state: &AppState, slugs: &[String]) -> Result<Vec<Uuid>, ApiError> {
    let mut ids = Vec::with_capacity(slugs.len());
    for slug in slugs {
        let genre = state
            .genre_repository
            .find_by_slug(slug)
            .await
            .map_err(|e| {
                error!("Failed to resolve genre slug: {}", e);
                ApiError::InternalServerError
            })?
            .ok_or_else(|| ApiError::validation("genre", format!("Unknown genre '{slug}'")))?;
        ids.push(genre.id);
    }

    Ok(ids)
}
