//! API models for entities and request/response payloads

pub mod catalog;
pub mod feedback;
pub mod user;

// Re-export for convenience
pub use catalog::{
    Category, CategoryResponse, CreateCategoryRequest, CreateGenreRequest, CreateTitleRequest,
    Genre, GenreResponse, SearchQuery, TitleQuery, TitleResponse, UpdateTitleRequest,
};
pub use feedback::{
    Comment, CommentResponse, CreateCommentRequest, CreateReviewRequest, Review, ReviewResponse,
    UpdateCommentRequest, UpdateReviewRequest,
};
pub use user::{
    CreateUserRequest, SignupRequest, SignupResponse, TokenRequest, TokenResponse,
    UpdateMeRequest, UpdateUserRequest, User, UserResponse,
};
