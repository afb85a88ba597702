//! Exposure record operations.
//!
//! An exposure is a synthetic finding that a broker "has" the user's data,
//! created during a scan run and immutable afterwards. The exposed-data
//! label list is stored as a JSON array in a text column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};

/// A synthetic finding tying one broker to one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exposure {
    /// Unique identifier
    pub id: String,
    /// Owning scan id
    pub scan_id: String,
    /// Catalog id of the broker the data was "found" on
    pub broker_id: String,
    /// Labels of the data types exposed (1-6 entries)
    pub exposed_data: Vec<String>,
    /// Synthesized URL of the broker's profile page for the user
    pub profile_url: Option<String>,
    /// When the exposure was discovered
    pub discovered_at: DateTime<Utc>,
}

/// Fields for creating an exposure.
#[derive(Debug, Clone)]
pub struct NewExposure {
    /// Owning scan id
    pub scan_id: String,
    /// Catalog id of the broker
    pub broker_id: String,
    /// Labels of the data types exposed
    pub exposed_data: Vec<String>,
    /// Synthesized profile URL
    pub profile_url: Option<String>,
}

/// Create a new exposure.
///
/// # Errors
/// Returns `sqlx::Error` if the insert fails or the label list cannot be
/// encoded.
pub async fn create_exposure(
    pool: &Pool<Sqlite>,
    new_exposure: NewExposure,
) -> Result<Exposure, sqlx::Error> {
    let id = delist_core::types::new_record_id();
    let discovered_at = Utc::now();
    let exposed_data_json = serde_json::to_string(&new_exposure.exposed_data)
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query(
        "INSERT INTO exposures (id, scan_id, broker_id, exposed_data, profile_url, discovered_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&new_exposure.scan_id)
    .bind(&new_exposure.broker_id)
    .bind(&exposed_data_json)
    .bind(&new_exposure.profile_url)
    .bind(discovered_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(Exposure {
        id,
        scan_id: new_exposure.scan_id,
        broker_id: new_exposure.broker_id,
        exposed_data: new_exposure.exposed_data,
        profile_url: new_exposure.profile_url,
        discovered_at,
    })
}

/// Get an exposure by id.
///
/// # Errors
/// Returns `sqlx::Error` if the query fails.
pub async fn get_exposure(
    pool: &Pool<Sqlite>,
    id: &str,
) -> Result<Option<Exposure>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM exposures WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(parse_exposure_from_row).transpose()
}

/// Get all exposures for a scan, in discovery order.
///
/// # Errors
/// Returns `sqlx::Error` if the query fails.
pub async fn get_by_scan_id(
    pool: &Pool<Sqlite>,
    scan_id: &str,
) -> Result<Vec<Exposure>, sqlx::Error> {
    let rows =
        sqlx::query("SELECT * FROM exposures WHERE scan_id = ? ORDER BY discovered_at, id")
            .bind(scan_id)
            .fetch_all(pool)
            .await?;

    rows.into_iter().map(parse_exposure_from_row).collect()
}

fn parse_exposure_from_row(row: sqlx::sqlite::SqliteRow) -> Result<Exposure, sqlx::Error> {
    let exposed_data_json: String = row.try_get("exposed_data")?;
    let exposed_data: Vec<String> = serde_json::from_str(&exposed_data_json)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

    let discovered_at_str: String = row.try_get("discovered_at")?;
    let discovered_at = DateTime::parse_from_rfc3339(&discovered_at_str)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc);

    Ok(Exposure {
        id: row.try_get("id")?,
        scan_id: row.try_get("scan_id")?,
        broker_id: row.try_get("broker_id")?,
        exposed_data,
        profile_url: row.try_get("profile_url")?,
        discovered_at,
    })
}
