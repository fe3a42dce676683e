//! Feedback models: reviews and comments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    pub score: i32,
    pub title_id: Uuid,
    pub pub_date: DateTime<Utc>,
}

/// Public representation of a review; the author appears by username
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub score: i32,
    pub pub_date: DateTime<Utc>,
}

impl ReviewResponse {
    pub fn from_parts(review: Review, author: String) -> Self {
        ReviewResponse {
            id: review.id,
            text: review.text,
            author,
            score: review.score,
            pub_date: review.pub_date,
        }
    }
}

/// Request for review creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub score: i32,
}

/// Request for review update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReviewRequest {
    pub text: Option<String>,
    pub score: Option<i32>,
}

/// Comment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub author_id: Uuid,
    pub review_id: Uuid,
    pub pub_date: DateTime<Utc>,
}

/// Public representation of a comment; the author appears by username
#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

impl CommentResponse {
    pub fn from_parts(comment: Comment, author: String) -> Self {
        CommentResponse {
            id: comment.id,
            text: comment.text,
            author,
            pub_date: comment.pub_date,
        }
    }
}

/// Request for comment creation
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

/// Request for comment update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}
