//! Database connection management.
//!
//! Provides pool construction for the SQLite store used by the persistence
//! gateway.

use crate::error::{DatabaseError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

/// Open a SQLite connection pool at the given path.
///
/// The database file is created if it doesn't exist. Foreign keys are
/// enabled on every connection.
///
/// # Errors
/// Returns `DatabaseError::Open` if the path is invalid or the pool cannot
/// be initialized.
pub async fn connect(path: impl AsRef<Path>, max_connections: u32) -> Result<Pool<Sqlite>> {
    let path_str = path.as_ref().to_str().ok_or_else(|| {
        DatabaseError::Open("invalid database path: not valid UTF-8".to_string())
    })?;

    let connect_options = SqliteConnectOptions::from_str(path_str)
        .map_err(|e| DatabaseError::Open(format!("invalid connection string: {e}")))?
        .foreign_keys(true)
        .create_if_missing(true);

    // An in-memory SQLite database is private to its connection; a pool with
    // more than one connection would see more than one empty database.
    let max_connections = if path_str.contains(":memory:") {
        1
    } else {
        max_connections
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_options)
        .await
        .map_err(|e| DatabaseError::Open(format!("failed to initialize pool: {e}")))?;

    tracing::info!("Database pool created at {}", path_str);

    Ok(pool)
}
