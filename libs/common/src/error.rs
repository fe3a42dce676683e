//! Shared error types for database access
//!
//! Errors raised while configuring, connecting to, or querying the
//! PostgreSQL store, used by the Revue API service.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Error type for database configuration and operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Connecting to the database failed
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A query failed to execute
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Applying schema migrations failed
    #[error("Database migration error: {0}")]
    Migration(String),

    /// The database configuration taken from the environment is invalid
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
