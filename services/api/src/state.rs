//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::mailer::Mailer;
use crate::repositories::{
    CategoryRepository, CommentRepository, GenreRepository, ReviewRepository, TitleRepository,
    UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub category_repository: CategoryRepository,
    pub genre_repository: GenreRepository,
    pub title_repository: TitleRepository,
    pub review_repository: ReviewRepository,
    pub comment_repository: CommentRepository,
    pub jwt_service: JwtService,
    pub mailer: Mailer,
}
