//! Comment endpoints, nested under a title's review

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
    models::{Comment, CommentResponse, CreateCommentRequest, UpdateCommentRequest},
    permissions::{AuthUser, can_modify_contribution},
    state::AppState,
};

/// List comments of a review, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_review_exists(&state, title_id, review_id).await?;

    let comments = state
        .comment_repository
        .list_for_review(review_id)
        .await
        .map_err(|e| {
            error!("Failed to list comments: {}", e);
            ApiError::InternalServerError
        })?;

    let response: Vec<CommentResponse> = comments
        .into_iter()
        .map(|(comment, author)| CommentResponse::from_parts(comment, author))
        .collect();

    Ok(Json(response))
}

/// Get a comment of a review
pub async fn get_comment(
    State(state): State<AppState>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let (comment, author) = fetch_comment(&state, title_id, review_id, comment_id).await?;

    Ok(Json(CommentResponse::from_parts(comment, author)))
}

/// Create a comment on a review (any authenticated user)
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((title_id, review_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_review_exists(&state, title_id, review_id).await?;

    if payload.text.is_empty() {
        return Err(ApiError::validation("text", "Text is required"));
    }

    let comment = state
        .comment_repository
        .create(review_id, user.id, &payload.text)
        .await
        .map_err(|e| {
            error!("Failed to create comment: {}", e);
            ApiError::InternalServerError
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse::from_parts(comment, user.username)),
    ))
}

/// Update a comment (author, moderator, or admin)
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(payload): Json<UpdateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let (comment, author) = fetch_comment(&state, title_id, review_id, comment_id).await?;

    if !can_modify_contribution(&user, comment.author_id) {
        return Err(ApiError::Forbidden);
    }

    if let Some(text) = payload.text.as_deref() {
        if text.is_empty() {
            return Err(ApiError::validation("text", "Text is required"));
        }
    }

    let updated = state
        .comment_repository
        .update(comment_id, &payload)
        .await
        .map_err(|e| {
            error!("Failed to update comment: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(CommentResponse::from_parts(updated, author)))
}

/// Delete a comment (author, moderator, or admin)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path((title_id, review_id, comment_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    let (comment, _) = fetch_comment(&state, title_id, review_id, comment_id).await?;

    if !can_modify_contribution(&user, comment.author_id) {
        return Err(ApiError::Forbidden);
    }

    state
        .comment_repository
        .delete(comment_id)
        .await
        .map_err(|e| {
            error!("Failed to delete comment: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the title/review path parameters or fail with not-found
async fn ensure_review_exists(
    state: &AppState,
    title_id: Uuid,
    review_id: Uuid,
) -> Result<(), ApiError> {
    let exists = state.title_repository.exists(title_id).await.map_err(|e| {
        error!("Failed to check title existence: {}", e);
        ApiError::InternalServerError
    })?;
    if !exists {
        return Err(ApiError::NotFound("Title"));
    }

    let review = state
        .review_repository
        .get(title_id, review_id)
        .await
        .map_err(|e| {
            error!("Failed to check review existence: {}", e);
            ApiError::InternalServerError
        })?;
    if review.is_none() {
        return Err(ApiError::NotFound("Review"));
    }

    Ok(())
}

/// Fetch a comment scoped to its review and title, or fail with not-found
async fn fetch_comment(
    state: &AppState,
    title_id: Uuid,
    review_id: Uuid,
    comment_id: Uuid,
) -> Result<(Comment, String), ApiError> {
    ensure_review_exists(state, title_id, review_id).await?;

    state
        .comment_repository
        .get(review_id, comment_id)
        .await
        .map_err(|e| {
            error!("Failed to get comment: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("Comment"))
}
