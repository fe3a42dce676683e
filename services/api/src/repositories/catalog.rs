//! Category and genre repositories for database operations

use anyhow::Result;
use sqlx::{PgPool, Row};
use tracing::info;

use crate::models::{Category, Genre};

/// Category repository
#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    /// Create a new category repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List categories, optionally filtered by a name substring
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, slug
            FROM categories
            WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'
            ORDER BY name
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Category {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
            })
            .collect())
    }

    /// Create a new category
    pub async fn create(&self, name: &str, slug: &str) -> Result<Category> {
        info!("Creating category: {}", slug);

        let row = sqlx::query(
            r#"
            INSERT INTO categories (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug
            "#,
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(Category {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
        })
    }

    /// Find a category by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name, slug FROM categories WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Category {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
        }))
    }

    /// Delete a category by slug
    pub async fn delete_by_slug(&self, slug: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Genre repository
#[derive(Clone)]
pub struct GenreRepository {
    pool: PgPool,
}

impl GenreRepository {
    /// Create a new genre repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List genres, optionally filtered by a name substring
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Genre>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, slug
            FROM genres
            WHERE $1::text IS NULL OR name ILIKE '%' || $1 || '%'
            ORDER BY name
            "#,
        )
        .bind(search)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Genre {
                id: row.get("id"),
                name: row.get("name"),
                slug: row.get("slug"),
            })
            .collect())
    }

    /// Create a new genre
    pub async fn create(&self, name: &str, slug: &str) -> Result<Genre> {
        info!("Creating genre: {}", slug);

        let row = sqlx::query(
            r#"
            INSERT INTO genres (name, slug)
            VALUES ($1, $2)
            RETURNING id, name, slug
            "#,
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        Ok(Genre {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
        })
    }

    /// Find a genre by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Genre>> {
        let row = sqlx::query("SELECT id, name, slug FROM genres WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Genre {
            id: row.get("id"),
            name: row.get("name"),
            slug: row.get("slug"),
        }))
    }

    /// Delete a genre by slug
    pub async fn delete_by_slug(&self, slug: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM genres WHERE slug = $1")
            .bind(slug)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
