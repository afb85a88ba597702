//! Scan engine error types.

use thiserror::Error;

/// Errors surfaced by the scan engine.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan row disappeared between creation and the background run
    #[error("scan not found: {scan_id}")]
    MissingScan {
        /// Id of the missing scan
        scan_id: String,
    },

    /// The scan's owning user no longer exists
    #[error("user not found: {user_id}")]
    MissingUser {
        /// Id of the missing user
        user_id: String,
    },

    /// A query against the persistence gateway failed
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Opening or migrating the database failed
    #[error(transparent)]
    Gateway(#[from] delist_db::DatabaseError),
}

/// Convenience alias for scan engine results.
pub type Result<T> = std::result::Result<T, ScanError>;
