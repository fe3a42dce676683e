//! Repositories for database operations

pub mod catalog;
pub mod feedback;
pub mod title;
pub mod user;

// Re-export for convenience
pub use catalog::{CategoryRepository, GenreRepository};
pub use feedback::{CommentRepository, ReviewRepository};
pub use title::TitleRepository;
pub use user::UserRepository;
