//! Persistence gateway for Delist.
//!
//! Owns the `SQLite` schema and exposes per-table operation modules over a
//! shared connection pool. All timestamps are stored as RFC 3339 text and
//! list-valued columns as JSON text, so rows stay inspectable with plain
//! `sqlite3`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod connection;
pub mod error;
pub mod exposures;
pub mod migrations;
pub mod removal_requests;
pub mod scans;
pub mod users;

pub use error::{DatabaseError, Result};
pub use exposures::{Exposure, NewExposure};
pub use removal_requests::{ActionRequired, RemovalRequest, RemovalStatus};
pub use scans::{Scan, ScanStatus};
pub use users::{NewUser, User};

use sqlx::{Pool, Sqlite};

/// Handle to the application database.
///
/// Cheap to clone; all clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (creating if missing) the database at `path`.
    ///
    /// # Errors
    /// Returns `DatabaseError::Open` if the database cannot be opened.
    pub async fn new(path: &str, max_connections: u32) -> Result<Self> {
        let pool = connection::connect(path, max_connections).await?;
        Ok(Self { pool })
    }

    /// Apply any pending schema migrations.
    ///
    /// # Errors
    /// Returns `DatabaseError::Migration` if a migration fails.
    pub async fn run_migrations(&self) -> Result<()> {
        migrations::run_migrations(&self.pool).await
    }

    /// The underlying connection pool, for the per-table operation modules.
    #[must_use]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
