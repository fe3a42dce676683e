//! Signup and token-exchange endpoints

use axum::{Json, extract::State, response::IntoResponse};
use tracing::{error, info};

use crate::{
    error::ApiError,
    mailer::generate_confirmation_code,
    models::{SignupRequest, SignupResponse, TokenRequest, TokenResponse, User},
    state::AppState,
    validation::{validate_email, validate_username},
};

/// Signup endpoint
///
/// Issues a confirmation code for a new (username, email) pair. Repeating the
/// exact same pair re-issues a fresh code; colliding with an existing account
/// on only one of the two fields is a conflict.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Signup attempt for username: {}", payload.username);

    validate_username(&payload.username).map_err(|e| ApiError::validation("username", e))?;
    validate_email(&payload.email).map_err(|e| ApiError::validation("email", e))?;

    let by_username = state
        .user_repository
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to look up username: {}", e);
            ApiError::InternalServerError
        })?;

    let by_email = state
        .user_repository
        .find_by_email(&payload.email)
        .await
        .map_err(|e| {
            error!("Failed to look up email: {}", e);
            ApiError::InternalServerError
        })?;

    let user: User = match (by_username, by_email) {
        (Some(u), Some(v)) if u.id == v.id => u,
        (None, None) => state
            .user_repository
            .create_from_signup(&payload.username, &payload.email)
            .await
            .map_err(|e| {
                ApiError::conflict_or_internal(e, "Username or email is already taken")
            })?,
        _ => {
            return Err(ApiError::Conflict(
                "Username or email is already taken".to_string(),
            ));
        }
    };

    let code = generate_confirmation_code();
    state
        .user_repository
        .set_confirmation_code(user.id, &code)
        .await
        .map_err(|e| {
            error!("Failed to store confirmation code: {}", e);
            ApiError::InternalServerError
        })?;

    state.mailer.send_confirmation_code(&user.email, &code);

    Ok(Json(SignupResponse {
        email: user.email,
        username: user.username,
    }))
}

/// Token-exchange endpoint: username + confirmation code for a bearer token
pub async fn token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Token request for username: {}", payload.username);

    let user = state
        .user_repository
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to look up username: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::NotFound("User"))?;

    if user.confirmation_code.as_deref() != Some(payload.confirmation_code.as_str()) {
        return Err(ApiError::validation(
            "confirmation_code",
            "Invalid confirmation code",
        ));
    }

    let token = state.jwt_service.generate_access_token(&user).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(Json(TokenResponse { token }))
}
