//! Error types for the PostgreSQL corpus backend.

use sqlx_core::error::Error as SqlxError;
use wikistats_storage::StorageError;

/// PostgreSQL error code for undefined table (42P01).
pub const PG_UNDEFINED_TABLE: &str = "42P01";

/// Checks if a sqlx error has a specific PostgreSQL error code.
pub fn has_pg_error_code(err: &SqlxError, code: &str) -> bool {
    if let SqlxError::Database(db_err) = err {
        db_err.code().as_deref() == Some(code)
    } else {
        false
    }
}

/// Checks if a sqlx error is "undefined table" (42P01).
pub fn is_undefined_table(err: &SqlxError) -> bool {
    has_pg_error_code(err, PG_UNDEFINED_TABLE)
}

/// Errors specific to the PostgreSQL backend setup.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database connection error.
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx_core::error::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl PostgresError {
    /// Creates a new configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

impl From<PostgresError> for StorageError {
    fn from(err: PostgresError) -> Self {
        match err {
            PostgresError::Connection(e) => StorageError::connection(e.to_string()),
            PostgresError::Migration(e) => StorageError::internal(format!("Migration error: {e}")),
            PostgresError::Config { message } => {
                StorageError::internal(format!("Configuration error: {message}"))
            }
        }
    }
}

/// Maps a query-time sqlx error onto the storage error taxonomy.
pub(crate) fn query_error(context: &str, err: SqlxError) -> StorageError {
    match &err {
        SqlxError::PoolTimedOut | SqlxError::PoolClosed | SqlxError::Io(_) | SqlxError::Tls(_) => {
            StorageError::connection(format!("{context}: {err}"))
        }
        _ if is_undefined_table(&err) => {
            StorageError::query(format!("{context}: corpus table missing: {err}"))
        }
        _ => StorageError::query(format!("{context}: {err}")),
    }
}

/// Result type alias for PostgreSQL setup operations.
pub type Result<T> = std::result::Result<T, PostgresError>;
