//! Scan record operations.
//!
//! A scan row tracks one execution of the scan engine: running progress
//! counters, the final privacy score, and the terminal status. Counters are
//! only ever advanced, never rewound, so pollers observe monotonic progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};
use std::fmt;

/// Status of a scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStatus {
    /// Scan is currently in progress
    Running,
    /// Scan completed successfully
    Completed,
    /// Scan's background task died; it will not make further progress
    Failed,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl ScanStatus {
    fn parse(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Running,
        }
    }
}

/// One execution of the scan engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scan {
    /// Unique identifier
    pub id: String,
    /// Owning user id
    pub user_id: String,
    /// Current status
    pub status: ScanStatus,
    /// Number of brokers processed so far
    pub sites_scanned: i64,
    /// Number of brokers where an exposure was found so far
    pub sites_found: i64,
    /// Final privacy score (0-100); stays 0 until the scan completes
    pub privacy_score: i64,
    /// When the scan was started
    pub created_at: DateTime<Utc>,
    /// When the scan completed (if finished)
    pub completed_at: Option<DateTime<Utc>>,
    /// Error message if the scan failed
    pub error_message: Option<String>,
}

/// Create a new running scan with zeroed counters.
///
/// # Errors
/// Returns `sqlx::Error` if the insert fails.
pub async fn create_scan(pool: &Pool<Sqlite>, user_id: String) -> Result<Scan, sqlx::Error> {
    let id = delist_core::types::new_record_id();
    let created_at = Utc::now();
    let status = ScanStatus::Running;

    sqlx::query(
        "INSERT INTO scans (id, user_id, status, sites_scanned, sites_found, privacy_score, created_at)
         VALUES (?, ?, ?, 0, 0, 0, ?)",
    )
    .bind(&id)
    .bind(&user_id)
    .bind(status.to_string())
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(Scan {
        id,
        user_id,
        status,
        sites_scanned: 0,
        sites_found: 0,
        privacy_score: 0,
        created_at,
        completed_at: None,
        error_message: None,
    })
}

/// Get a scan by id.
///
/// # Errors
/// Returns `sqlx::Error` if the query fails.
pub async fn get_scan(pool: &Pool<Sqlite>, id: &str) -> Result<Option<Scan>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM scans WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(parse_scan_from_row).transpose()
}

/// Get all scans owned by a user, newest first.
///
/// # Errors
/// Returns `sqlx::Error` if the query fails.
pub async fn get_by_user_id(
    pool: &Pool<Sqlite>,
    user_id: &str,
) -> Result<Vec<Scan>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM scans WHERE user_id = ? ORDER BY created_at DESC, id")
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    rows.into_iter().map(parse_scan_from_row).collect()
}

/// Persist the running progress counters for a scan.
///
/// Called after every broker so progress is externally observable mid-run.
///
/// # Errors
/// Returns `sqlx::Error` if the update fails.
pub async fn update_progress(
    pool: &Pool<Sqlite>,
    id: &str,
    sites_scanned: i64,
    sites_found: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE scans SET sites_scanned = ?, sites_found = ? WHERE id = ?")
        .bind(sites_scanned)
        .bind(sites_found)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Mark a scan completed with its final privacy score.
///
/// # Errors
/// Returns `sqlx::Error` if the update fails.
pub async fn complete_scan(
    pool: &Pool<Sqlite>,
    id: &str,
    privacy_score: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE scans SET status = 'completed', privacy_score = ?, completed_at = ? WHERE id = ?")
        .bind(privacy_score)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Mark a scan failed.
///
/// Set by the background task's error-catch path so a dead run is
/// distinguishable from one that is still in progress.
///
/// # Errors
/// Returns `sqlx::Error` if the update fails.
pub async fn fail_scan(
    pool: &Pool<Sqlite>,
    id: &str,
    error_message: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE scans SET status = 'failed', completed_at = ?, error_message = ? WHERE id = ?")
        .bind(Utc::now().to_rfc3339())
        .bind(error_message)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}

fn parse_scan_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Scan, sqlx::Error> {
    let status_str: String = row.try_get("status")?;

    let created_at_str: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc);

    let completed_at = row
        .try_get::<Option<String>, _>("completed_at")?
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(Scan {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        status: ScanStatus::parse(&status_str),
        sites_scanned: row.try_get("sites_scanned")?,
        sites_found: row.try_get("sites_found")?,
        privacy_score: row.try_get("privacy_score")?,
        created_at,
        completed_at,
        error_message: row.try_get("error_message")?,
    })
}
