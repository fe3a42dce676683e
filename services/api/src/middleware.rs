//! Authentication middleware for bearer-token validation

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::{error::ApiError, permissions::AuthUser, state::AppState};

/// Authentication middleware
///
/// Validates the bearer token and attaches an [`AuthUser`] to the request
/// extensions. The user row is reloaded so role checks see the current role,
/// not the snapshot baked into the token.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract the Authorization header
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    // Check if it's a Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    // Validate the token
    let claims = state
        .jwt_service
        .validate_token(token)
        .map_err(|_| ApiError::Unauthorized)?;

    // Reload the user so a revoked account or changed role takes effect
    let user = state
        .user_repository
        .find_by_id(claims.sub)
        .await
        .map_err(|e| {
            error!("Failed to load user for token subject: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or(ApiError::Unauthorized)?;

    let auth_user = AuthUser {
        id: user.id,
        username: user.username,
        role: user.role,
    };

    // Insert the user into the request extensions
    req.extensions_mut().insert(auth_user);

    // Call the next service
    let response = next.run(req).await;

    Ok(response)
}
