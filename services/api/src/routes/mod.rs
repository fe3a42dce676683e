//! API service routes

use axum::{
    Json, Router,
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use serde_json::json;

use crate::{error::ApiError, middleware::auth_middleware, state::AppState};

pub mod auth;
pub mod categories;
pub mod comments;
pub mod genres;
pub mod reviews;
pub mod titles;
pub mod users;

/// Create the router for the API service
///
/// Safe (read) routes are open to anonymous callers; every mutating route
/// sits behind the bearer-token middleware, with finer role and ownership
/// checks inside the handlers.
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/v1/categories", post(categories::create_category))
        .route("/v1/categories/:slug", delete(categories::delete_category))
        .route("/v1/genres", post(genres::create_genre))
        .route("/v1/genres/:slug", delete(genres::delete_genre))
        .route("/v1/titles", post(titles::create_title))
        .route(
            "/v1/titles/:title_id",
            patch(titles::update_title).delete(titles::delete_title),
        )
        .route("/v1/titles/:title_id/reviews", post(reviews::create_review))
        .route(
            "/v1/titles/:title_id/reviews/:review_id",
            patch(reviews::update_review).delete(reviews::delete_review),
        )
        .route(
            "/v1/titles/:title_id/reviews/:review_id/comments",
            post(comments::create_comment),
        )
        .route(
            "/v1/titles/:title_id/reviews/:review_id/comments/:comment_id",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/v1/users", get(users::list_users).post(users::create_user))
        .route("/v1/users/me", get(users::get_me).patch(users::update_me))
        .route(
            "/v1/users/:username",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/v1/auth/signup", post(auth::signup))
        .route("/v1/auth/token", post(auth::token))
        .route("/v1/categories", get(categories::list_categories))
        .route("/v1/genres", get(genres::list_genres))
        .route("/v1/titles", get(titles::list_titles))
        .route("/v1/titles/:title_id", get(titles::get_title))
        .route("/v1/titles/:title_id/reviews", get(reviews::list_reviews))
        .route(
            "/v1/titles/:title_id/reviews/:review_id",
            get(reviews::get_review),
        )
        .route(
            "/v1/titles/:title_id/reviews/:review_id/comments",
            get(comments::list_comments),
        )
        .route(
            "/v1/titles/:title_id/reviews/:review_id/comments/:comment_id",
            get(comments::get_comment),
        )
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    common::database::health_check(&state.db_pool).await?;

    Ok(Json(json!({
        "status": "ok",
        "service": "revue-api"
    })))
}
