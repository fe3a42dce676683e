//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Payload validation failure on a specific field
    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Uniqueness conflict (duplicate review, taken username/email, taken slug)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Authenticated but not allowed to perform the action
    #[error("Forbidden")]
    Forbidden,

    /// Requested resource does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    /// Build a validation error for a named payload field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Map a repository error to a conflict or an internal error
    ///
    /// Uniqueness is pre-checked in the handlers, but two concurrent requests
    /// can both pass the check and race to the insert. The database UNIQUE
    /// constraint catches the loser, and that violation is still a client
    /// conflict, not a server fault.
    pub fn conflict_or_internal(e: anyhow::Error, message: impl Into<String>) -> Self {
        if let Some(sqlx::Error::Database(db)) = e.downcast_ref::<sqlx::Error>() {
            if db.is_unique_violation() {
                return ApiError::Conflict(message.into());
            }
        }

        tracing::error!("Database operation failed: {}", e);
        ApiError::InternalServerError
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // Field errors are keyed by the offending field so clients can
            // attach them to the right form input.
            ApiError::Validation { field, message } => {
                (StatusCode::BAD_REQUEST, json!({ field: [message] }))
            }
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" })),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                json!({ "error": "You do not have permission to perform this action" }),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{what} not found") }),
            ),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Database error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        let response = ApiError::validation("score", "Score must be between 1 and 10")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError::NotFound("Title").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let response = ApiError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violations_surface_as_conflicts() {
        let e = anyhow::Error::from(sqlx::Error::Database(Box::new(UniqueViolation)));
        let api_err = ApiError::conflict_or_internal(e, "You have already reviewed this title");
        assert!(
            matches!(api_err, ApiError::Conflict(msg) if msg == "You have already reviewed this title")
        );
    }

    #[test]
    fn other_repository_errors_stay_internal() {
        let e = anyhow::anyhow!("connection reset by peer");
        let api_err = ApiError::conflict_or_internal(e, "unused");
        assert!(matches!(api_err, ApiError::InternalServerError));
    }
}
