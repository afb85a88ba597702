//! Removal engine error types.

use thiserror::Error;

/// Errors surfaced by the removal engine.
#[derive(Debug, Error)]
pub enum RemovalError {
    /// A query against the persistence gateway failed
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Opening or migrating the database failed
    #[error(transparent)]
    Gateway(#[from] delist_db::DatabaseError),
}

/// Convenience alias for removal engine results.
pub type Result<T> = std::result::Result<T, RemovalError>;
