//! Review and comment repositories for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{Comment, Review, UpdateCommentRequest, UpdateReviewRequest};

/// Review repository
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

fn map_review(row: &PgRow) -> Review {
    Review {
        id: row.get("id"),
        text: row.get("text"),
        author_id: row.get("author_id"),
        score: row.get("score"),
        title_id: row.get("title_id"),
        pub_date: row.get("pub_date"),
    }
}

impl ReviewRepository {
    /// Create a new review repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List reviews of a title with their author usernames, oldest first
    pub async fn list_for_title(&self, title_id: Uuid) -> Result<Vec<(Review, String)>> {
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.text, r.author_id, r.score, r.title_id, r.pub_date,
                   u.username AS author
            FROM reviews r
            JOIN users u ON u.id = r.author_id
            WHERE r.title_id = $1
            ORDER BY r.pub_date
            "#,
        )
        .bind(title_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| (map_review(row), row.get("author")))
            .collect())
    }

    /// Get a review of a title, with its author username
    pub async fn get(&self, title_id: Uuid, review_id: Uuid) -> Result<Option<(Review, String)>> {
        let row = sqlx::query(
            r#"
            SELECT r.id, r.text, r.author_id, r.score, r.title_id, r.pub_date,
                   u.username AS author
            FROM reviews r
            JOIN users u ON u.id = r.author_id
            WHERE r.title_id = $1 AND r.id = $2
            "#,
        )
        .bind(title_id)
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| (map_review(&row), row.get("author"))))
    }

    /// Check whether an author has already reviewed a title
    pub async fn exists_for_author(&self, title_id: Uuid, author_id: Uuid) -> Result<bool> {
        let found: Option<i32> = sqlx::query_scalar(
            "SELECT 1 FROM reviews WHERE title_id = $1 AND author_id = $2",
        )
        .bind(title_id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Create a new review
    pub async fn create(
        &self,
        title_id: Uuid,
        author_id: Uuid,
        text: &str,
        score: i32,
    ) -> Result<Review> {
        info!("Creating review for title {}", title_id);

        let row = sqlx::query(
            r#"
            INSERT INTO reviews (text, author_id, score, title_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text, author_id, score, title_id, pub_date
            "#,
        )
        .bind(text)
        .bind(author_id)
        .bind(score)
        .bind(title_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_review(&row))
    }

    /// Update a review; unset fields keep their current values
    pub async fn update(&self, review_id: Uuid, payload: &UpdateReviewRequest) -> Result<Review> {
        let row = sqlx::query(
            r#"
            UPDATE reviews
            SET text = COALESCE($2, text),
                score = COALESCE($3, score)
            WHERE id = $1
            RETURNING id, text, author_id, score, title_id, pub_date
            "#,
        )
        .bind(review_id)
        .bind(payload.text.as_deref())
        .bind(payload.score)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_review(&row))
    }

    /// Delete a review by ID
    pub async fn delete(&self, review_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Comment repository
#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

fn map_comment(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        text: row.get("text"),
        author_id: row.get("author_id"),
        review_id: row.get("review_id"),
        pub_date: row.get("pub_date"),
    }
}

impl CommentRepository {
    /// Create a new comment repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List comments of a review with their author usernames, oldest first
    pub async fn list_for_review(&self, review_id: Uuid) -> Result<Vec<(Comment, String)>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.text, c.author_id, c.review_id, c.pub_date,
                   u.username AS author
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.review_id = $1
            ORDER BY c.pub_date
            "#,
        )
        .bind(review_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| (map_comment(row), row.get("author")))
            .collect())
    }

    /// Get a comment of a review, with its author username
    pub async fn get(
        &self,
        review_id: Uuid,
        comment_id: Uuid,
    ) -> Result<Option<(Comment, String)>> {
        let row = sqlx::query(
            r#"
            SELECT c.id, c.text, c.author_id, c.review_id, c.pub_date,
                   u.username AS author
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.review_id = $1 AND c.id = $2
            "#,
        )
        .bind(review_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| (map_comment(&row), row.get("author"))))
    }

    /// Create a new comment
    pub async fn create(&self, review_id: Uuid, author_id: Uuid, text: &str) -> Result<Comment> {
        info!("Creating comment for review {}", review_id);

        let row = sqlx::query(
            r#"
            INSERT INTO comments (text, author_id, review_id)
            VALUES ($1, $2, $3)
            RETURNING id, text, author_id, review_id, pub_date
            "#,
        )
        .bind(text)
        .bind(author_id)
        .bind(review_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(map_comment(&row))
    }

    /// Update a comment; unset fields keep their current values
    pub async fn update(&self, comment_id: Uuid, payload: &UpdateCommentRequest) -> Result<Comment> {
        let row = sqlx::query(
            r#"
            UPDATE comments
            SET text = COALESCE($2, text)
            WHERE id = $1
            RETURNING id, text, author_id, review_id, pub_date
            "#,
        )
        .bind(comment_id)
        .bind(payload.text.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(map_comment(&row))
    }

    /// Delete a comment by ID
    pub async fn delete(&self, comment_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
