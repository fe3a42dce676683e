//! User repository for database operations

use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{CreateUserRequest, UpdateMeRequest, UpdateUserRequest, User};
use crate::permissions::Role;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, bio, role, \
                            confirmation_code, created_at, updated_at";

fn map_user(row: &PgRow) -> Result<User> {
    let role: String = row.get("role");
    let role = role
        .parse::<Role>()
        .map_err(|e| anyhow::anyhow!("Invalid role stored for user: {e}"))?;

    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        bio: row.get("bio"),
        role,
        confirmation_code: row.get("confirmation_code"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user on the admin surface
    pub async fn create(&self, payload: &CreateUserRequest) -> Result<User> {
        info!("Creating new user: {}", payload.username);

        let role = payload.role.unwrap_or_default();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, email, first_name, last_name, bio, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&payload.username)
        .bind(&payload.email)
        .bind(payload.first_name.as_deref().unwrap_or(""))
        .bind(payload.last_name.as_deref().unwrap_or(""))
        .bind(payload.bio.as_deref().unwrap_or(""))
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        map_user(&row)
    }

    /// Create a bare user record from the signup flow, with the default role
    pub async fn create_from_signup(&self, username: &str, email: &str) -> Result<User> {
        info!("Creating user from signup: {}", username);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (username, email)
            VALUES ($1, $2)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        map_user(&row)
    }

    /// Get all users, ordered by username
    pub async fn get_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_user).collect()
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Find a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Find a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Update a user on the admin surface, by username
    pub async fn update_by_username(
        &self,
        username: &str,
        payload: &UpdateUserRequest,
    ) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio),
                role = COALESCE($7, role),
                updated_at = now()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(username)
        .bind(payload.username.as_deref())
        .bind(payload.email.as_deref())
        .bind(payload.first_name.as_deref())
        .bind(payload.last_name.as_deref())
        .bind(payload.bio.as_deref())
        .bind(payload.role.map(|r| r.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Update the calling user's own profile; the role stays untouched
    pub async fn update_profile(&self, id: Uuid, payload: &UpdateMeRequest) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                bio = COALESCE($6, bio),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(payload.username.as_deref())
        .bind(payload.email.as_deref())
        .bind(payload.first_name.as_deref())
        .bind(payload.last_name.as_deref())
        .bind(payload.bio.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_user).transpose()
    }

    /// Delete a user by username
    pub async fn delete_by_username(&self, username: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Store a freshly issued confirmation code on a user record
    pub async fn set_confirmation_code(&self, id: Uuid, code: &str) -> Result<()> {
        sqlx::query("UPDATE users SET confirmation_code = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(code)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
