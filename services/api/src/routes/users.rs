//! User endpoints: the admin surface plus `/users/me`

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use crate::{
    error::ApiError,
    models::{CreateUserRequest, UpdateMeRequest, UpdateUserRequest, UserResponse},
    permissions::{AuthUser, can_manage_users},
    state::AppState,
    validation::{validate_email, validate_username},
};

/// List all users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_manage_users(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    let users = state.user_repository.get_all().await.map_err(|e| {
        error!("Failed to list users: {}", e);
        ApiError::InternalServerError
    })?;

    let response: Vec<UserResponse> = users.into_iter().map(Into::into).collect();

    Ok(Json(response))
}

/// Create a user (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_manage_users(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    validate_username(&payload.username).map_err(|e| ApiError::validation("username", e))?;
    validate_email(&payload.email).map_err(|e| ApiError::validation("email", e))?;

    ensure_username_free(&state, &payload.username).await?;
    ensure_email_free(&state, &payload.email).await?;

    let created = state
        .user_repository
        .create(&payload)
        .await
        .map_err(|e| ApiError::conflict_or_internal(e, "Username or email is already taken"))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(created))))
}

/// Get a user by username (admin only)
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_manage_users(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    let found = state
        .user_repository
        .find_by_username(&username)
        .await
        .map_err(|e| {
            error!("Failed to get user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserResponse::from(found)))
}

/// Update a user by username (admin only)
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_manage_users(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    if let Some(new_username) = payload.username.as_deref() {
        validate_username(new_username).map_err(|e| ApiError::validation("username", e))?;
        if new_username != username {
            ensure_username_free(&state, new_username).await?;
        }
    }
    if let Some(new_email) = payload.email.as_deref() {
        validate_email(new_email).map_err(|e| ApiError::validation("email", e))?;
        ensure_email_free_except(&state, new_email, &username).await?;
    }

    let updated = state
        .user_repository
        .update_by_username(&username, &payload)
        .await
        .map_err(|e| ApiError::conflict_or_internal(e, "Username or email is already taken"))?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(UserResponse::from(updated)))
}

/// Delete a user by username (admin only)
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if !can_manage_users(Some(&user)) {
        return Err(ApiError::Forbidden);
    }

    let deleted = state
        .user_repository
        .delete_by_username(&username)
        .await
        .map_err(|e| {
            error!("Failed to delete user: {}", e);
            ApiError::InternalServerError
        })?;

    if !deleted {
        return Err(ApiError::NotFound("User"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Get the calling user's own profile
pub async fn get_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let me = state
        .user_repository
        .find_by_id(user.id)
        .await
        .map_err(|e| {
            error!("Failed to get own profile: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserResponse::from(me)))
}

/// Update the calling user's own profile; the role stays read-only
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(new_username) = payload.username.as_deref() {
        validate_username(new_username).map_err(|e| ApiError::validation("username", e))?;
        if new_username != user.username {
            ensure_username_free(&state, new_username).await?;
        }
    }
    if let Some(new_email) = payload.email.as_deref() {
        validate_email(new_email).map_err(|e| ApiError::validation("email", e))?;
        ensure_email_free_except(&state, new_email, &user.username).await?;
    }

    let updated = state
        .user_repository
        .update_profile(user.id, &payload)
        .await
        .map_err(|e| ApiError::conflict_or_internal(e, "Username or email is already taken"))?
        .ok_or(ApiError::Unauthorized)?;

    Ok(Json(UserResponse::from(updated)))
}

/// Fail with a conflict if the username is already taken
async fn ensure_username_free(state: &AppState, username: &str) -> Result<(), ApiError> {
    let existing = state
        .user_repository
        .find_by_username(username)
        .await
        .map_err(|e| {
            error!("Failed to look up username: {}", e);
            ApiError::InternalServerError
        })?;

    if existing.is_some() {
        return Err(ApiError::Conflict(format!(
            "Username '{username}' is already taken"
        )));
    }

    Ok(())
}

/// Fail with a conflict if the email belongs to anyone else
async fn ensure_email_free(state: &AppState, email: &str) -> Result<(), ApiError> {
    ensure_email_free_except(state, email, "").await
}

/// Fail with a conflict if the email belongs to any user other than `owner`
async fn ensure_email_free_except(
    state: &AppState,
    email: &str,
    owner: &str,
) -> Result<(), ApiError> {
    let existing = state
        .user_repository
        .find_by_email(email)
        .await
        .map_err(|e| {
            error!("Failed to look up email: {}", e);
            ApiError::InternalServerError
        })?;

    if let Some(existing) = existing {
        if existing.username != owner {
            return Err(ApiError::Conflict(format!(
                "Email '{email}' is already taken"
            )));
        }
    }

    Ok(())
}
