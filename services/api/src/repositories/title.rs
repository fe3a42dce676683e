//! Title repository for database operations
//!
//! The rating of a title is never stored. Every read path goes through the
//! same aggregate query, so a title without reviews reads as rating 0.

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{CategoryResponse, GenreResponse, TitleQuery, TitleResponse};

/// Title repository
#[derive(Clone)]
pub struct TitleRepository {
    pool: PgPool,
}

const TITLE_SELECT: &str = r#"
    SELECT t.id, t.name, t.year, t.description,
           c.name AS category_name, c.slug AS category_slug,
           CAST(COALESCE(AVG(r.score), 0) AS DOUBLE PRECISION) AS rating
    FROM titles t
    LEFT JOIN categories c ON c.id = t.category_id
    LEFT JOIN reviews r ON r.title_id = t.id
"#;

fn map_title(row: &PgRow, genre: Vec<GenreResponse>) -> TitleResponse {
    let category = row
        .get::<Option<String>, _>("category_slug")
        .map(|slug| CategoryResponse {
            name: row.get("category_name"),
            slug,
        });

    TitleResponse {
        id: row.get("id"),
        name: row.get("name"),
        year: row.get("year"),
        description: row.get("description"),
        genre,
        category,
        rating: row.get("rating"),
    }
}

impl TitleRepository {
    /// Create a new title repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List titles with their ratings, filtered by the query parameters
    pub async fn list(&self, query: &TitleQuery) -> Result<Vec<TitleResponse>> {
        let sql = format!(
            r#"
            {TITLE_SELECT}
            WHERE ($1::text IS NULL OR c.slug = $1)
              AND ($2::text IS NULL OR EXISTS (
                      SELECT 1 FROM title_genres tg
                      JOIN genres g ON g.id = tg.genre_id
                      WHERE tg.title_id = t.id AND g.slug = $2))
              AND ($3::text IS NULL OR t.name ILIKE '%' || $3 || '%')
              AND ($4::int4 IS NULL OR t.year = $4)
            GROUP BY t.id, c.id
            ORDER BY t.name
            "#,
        );

        let rows = sqlx::query(&sql)
            .bind(query.category.as_deref())
            .bind(query.genre.as_deref())
            .bind(query.name.as_deref())
            .bind(query.year)
            .fetch_all(&self.pool)
            .await?;

        let mut titles = Vec::with_capacity(rows.len());
        for row in &rows {
            let genre = self.genres_of(row.get("id")).await?;
            titles.push(map_title(row, genre));
        }

        Ok(titles)
    }

    /// Get a title with its rating by ID
    pub async fn get(&self, id: Uuid) -> Result<Option<TitleResponse>> {
        let sql = format!("{TITLE_SELECT} WHERE t.id = $1 GROUP BY t.id, c.id");

        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => {
                let genre = self.genres_of(id).await?;
                Ok(Some(map_title(&row, genre)))
            }
            None => Ok(None),
        }
    }

    /// Check whether a title exists
    pub async fn exists(&self, id: Uuid) -> Result<bool> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM titles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Create a new title with its genre links
    pub async fn create(
        &self,
        name: &str,
        year: i32,
        description: Option<&str>,
        category_id: Option<Uuid>,
        genre_ids: &[Uuid],
    ) -> Result<Uuid> {
        info!("Creating title: {}", name);

        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO titles (name, year, description, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(year)
        .bind(description)
        .bind(category_id)
        .fetch_one(&mut *tx)
        .await?;

        for genre_id in genre_ids {
            sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(id)
    }

    /// Update a title; unset fields keep their current values
    ///
    /// `description` and `category_id` take a double `Option`: the outer level
    /// says whether the field was part of the request, the inner level is the
    /// new value, which may be an explicit NULL to clear the column.
    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        year: Option<i32>,
        description: Option<Option<&str>>,
        category_id: Option<Option<Uuid>>,
        genre_ids: Option<&[Uuid]>,
    ) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE titles
            SET name = COALESCE($2, name),
                year = COALESCE($3, year),
                description = CASE WHEN $5 THEN $4 ELSE description END,
                category_id = CASE WHEN $7 THEN $6 ELSE category_id END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(year)
        .bind(description.flatten())
        .bind(description.is_some())
        .bind(category_id.flatten())
        .bind(category_id.is_some())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        // A genre list in the payload replaces the existing links wholesale.
        if let Some(genre_ids) = genre_ids {
            sqlx::query("DELETE FROM title_genres WHERE title_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for genre_id in genre_ids {
                sqlx::query("INSERT INTO title_genres (title_id, genre_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(true)
    }

    /// Delete a title by ID
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM titles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch the genres linked to a title
    async fn genres_of(&self, title_id: Uuid) -> Result<Vec<GenreResponse>> {
        let rows = sqlx::query(
            r#"
            SELECT g.name, g.slug
            FROM genres g
            JOIN title_genres tg ON tg.genre_id = g.id
            WHERE tg.title_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(title_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| GenreResponse {
                name: row.get("name"),
                slug: row.get("slug"),
            })
            .collect())
    }
}
