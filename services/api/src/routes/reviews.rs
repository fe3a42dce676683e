//! Review endpoints, nested under a title

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateReviewRequest, Review, ReviewResponse, UpdateReviewRequest},
    permissions::{AuthUser, can_modify_contribution},
    state::AppState,
    validation::validate_score,
};

/// List reviews of a title, oldest first
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(title_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_title_exists(&state, title_id).await?;

    let reviews = state
        .review_repository
        .list_for_title(title_id)
        .await
        .map_err(|e| {
            error!("Failed to list reviews: {}", e);
            ApiError::InternalServerError
        })?;

    let response: Vec<ReviewResponse> = reviews
        .into_iter()
        .map(|(review, author)| ReviewResponse::from_parts(review, author))
        .collect();

    Ok(Json(response))
}

/// Get a review of a title
pub async fn get_review(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let (review, author) = fetch_review(&state, title_id, review_id).await?;

    Ok(Json(ReviewResponse::from_parts(review, author)))
}

/// Create a review for a title (any authenticated user, once per title)
pub async fn create_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(title_id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_title_exists(&state, title_id).await?;

    validate_score(payload.score).map_err(|e| ApiError::validation("score", e))?;
    if payload.text.is_empty() {
        return Err(ApiError::validation("text", "Text is required"));
    }

    let already_reviewed = state
        .review_repository
        .exists_for_author(title_id, user.id)
        .await
        .map_err(|e| {
            error!("Failed to check for existing review: {}", e);
            ApiError::InternalServerError
        })?;

    if already_reviewed {
        return Err(ApiError::Conflict(
            "You have already reviewed this title".to_string(),
        ));
    }

    // The unique (author, title) constraint backstops the check above when
    // two requests race.
    let review = state
        .review_repository
        .create(title_id, user.id, &payload.text, payload.score)
        .await
        .map_err(|e| {
            ApiError::conflict_or_internal(e, "You have already reviewed this title")
        })?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse::from_parts(review, user.username)),
    ))
}

/// Update a review (author, moderator, or admin)
pub async fn update_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (review, author) = fetch_review(&state, title_id, review_id).await?;

    if !can_modify_contribution(&user, review.author_id) {
        return Err(ApiError::Forbidden);
    }

    if let Some(score) = payload.score {
        validate_score(score).map_err(|e| ApiError::validation("score", e))?;
    }
    if let Some(text) = payload.text.as_deref() {
        if text.is_empty() {
            return Err(ApiError::validation("text", "Text is required"));
        }
    }

    let updated = state
        .review_repository
        .update(review_id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update review: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ReviewResponse::from_parts(updated, author)))
}

/// Delete a review (author, moderator, or admin)
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let (review, _) = fetch_review(&state, title_id, review_id).await?;

    if !can_modify_contribution(&user, review.author_id) {
        return Err(ApiError::Forbidden);
    }

    state
        .review_repository
        .delete(review_id)
        .await
        .map_err(|e| {
            error!("Failed to delete review: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the title path parameter or fail with not-found
async fn ensure_title_exists(state: &AppState, title_id: Uuid) -> Result<(), ApiError> {
    let exists = state.title_repository.exists(title_id).await.map_err(|e| {
        error!("Failed to check title existence: {}", e);
        ApiError::InternalServerError
    })?;

    if !exists {
        return Err(ApiError::NotFound("Title"));
    }

    Ok(())
}

/// Fetch a review scoped to its title, or fail with not-found
async fn fetch_review(
    state: &AppState,
    title_id: Uuid,
    review_id: Uuid,
) -> Result<(Review, String), ApiError> {
    ensure_title_exists(state, title_id).await?;

    state
        .review_repository
        .get(title_id, review_id)
        .await
        .map_err(|e| {
            error!("Failed to get review: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Review"))
}
