//! Removal request operations.
//!
//! A removal request is one remediation attempt tied to one exposure. The
//! removal engine creates them pending and classifies each exactly once;
//! after that only the external status-override path may touch them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Pool, Row, Sqlite};
use std::fmt;

/// Status of a removal request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalStatus {
    /// Created but not yet classified
    Pending,
    /// Submitted to the broker, awaiting response
    InProgress,
    /// Blocked on a verification step by the user
    ActionRequired,
    /// Removal finished
    Completed,
}

impl fmt::Display for RemovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in-progress"),
            Self::ActionRequired => write!(f, "action-required"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl RemovalStatus {
    /// Parse the wire/database representation.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "in-progress" => Self::InProgress,
            "action-required" => Self::ActionRequired,
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }
}

/// Verification step a broker demands before a removal can proceed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ActionRequired {
    /// The broker wants an email round-trip
    EmailVerification,
    /// The broker wants a government ID
    IdVerification,
}

impl fmt::Display for ActionRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmailVerification => write!(f, "email-verification"),
            Self::IdVerification => write!(f, "id-verification"),
        }
    }
}

impl ActionRequired {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "email-verification" => Some(Self::EmailVerification),
            "id-verification" => Some(Self::IdVerification),
            _ => None,
        }
    }
}

/// One remediation attempt tracked against a single exposure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalRequest {
    /// Unique identifier
    pub id: String,
    /// The exposure this request remediates
    pub exposure_id: String,
    /// Current status
    pub status: RemovalStatus,
    /// Outstanding verification step, if any
    pub action_required: Option<ActionRequired>,
    /// Free-text description of the simulated outcome
    pub notes: Option<String>,
    /// Retry counter (present in the schema; never incremented by the engine)
    pub retry_count: i64,
    /// When the request was created
    pub created_at: DateTime<Utc>,
    /// When the engine classified the request
    pub submitted_at: Option<DateTime<Utc>>,
    /// When the removal completed (only for completed requests)
    pub completed_at: Option<DateTime<Utc>>,
}

/// Create a new pending removal request for an exposure.
///
/// # Errors
/// Returns `sqlx::Error` if the insert fails.
pub async fn create_removal_request(
    pool: &Pool<Sqlite>,
    exposure_id: String,
) -> Result<RemovalRequest, sqlx::Error> {
    let id = delist_core::types::new_record_id();
    let created_at = Utc::now();

    sqlx::query(
        "INSERT INTO removal_requests (id, exposure_id, status, retry_count, created_at)
         VALUES (?, ?, 'pending', 0, ?)",
    )
    .bind(&id)
    .bind(&exposure_id)
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(RemovalRequest {
        id,
        exposure_id,
        status: RemovalStatus::Pending,
        action_required: None,
        notes: None,
        retry_count: 0,
        created_at,
        submitted_at: None,
        completed_at: None,
    })
}

/// Get a removal request by id.
///
/// # Errors
/// Returns `sqlx::Error` if the query fails.
pub async fn get_removal_request(
    pool: &Pool<Sqlite>,
    id: &str,
) -> Result<Option<RemovalRequest>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM removal_requests WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(parse_request_from_row).transpose()
}

/// Get all removal requests for a scan, in creation order.
///
/// Joins through `exposures` to resolve the scan.
///
/// # Errors
/// Returns `sqlx::Error` if the query fails.
pub async fn get_by_scan_id(
    pool: &Pool<Sqlite>,
    scan_id: &str,
) -> Result<Vec<RemovalRequest>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT rr.* FROM removal_requests rr
         INNER JOIN exposures e ON rr.exposure_id = e.id
         WHERE e.scan_id = ?
         ORDER BY rr.created_at, rr.id",
    )
    .bind(scan_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(parse_request_from_row).collect()
}

/// Record the engine's classification of a request.
///
/// Stamps `submitted_at`, and `completed_at` when the outcome is completed.
///
/// # Errors
/// Returns `sqlx::Error` if the update fails.
pub async fn classify_request(
    pool: &Pool<Sqlite>,
    id: &str,
    status: RemovalStatus,
    action_required: Option<ActionRequired>,
    notes: &str,
) -> Result<(), sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let completed_at = (status == RemovalStatus::Completed).then(|| now.clone());

    sqlx::query(
        "UPDATE removal_requests
         SET status = ?, action_required = ?, notes = ?, submitted_at = ?, completed_at = ?
         WHERE id = ?",
    )
    .bind(status.to_string())
    .bind(action_required.map(|a| a.to_string()))
    .bind(notes)
    .bind(&now)
    .bind(completed_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Apply an external status override to a request.
///
/// Returns the updated request, or `None` if no such request exists. Moving
/// to completed stamps `completed_at`. Notes are only replaced when the
/// caller supplies them; a status-only override leaves the existing notes
/// in place.
///
/// # Errors
/// Returns `sqlx::Error` if the update or re-read fails.
pub async fn apply_status_override(
    pool: &Pool<Sqlite>,
    id: &str,
    status: RemovalStatus,
    notes: Option<String>,
) -> Result<Option<RemovalRequest>, sqlx::Error> {
    let completed_at =
        (status == RemovalStatus::Completed).then(|| Utc::now().to_rfc3339());

    let result = sqlx::query(
        "UPDATE removal_requests
         SET status = ?, notes = COALESCE(?, notes), completed_at = COALESCE(?, completed_at)
         WHERE id = ?",
    )
    .bind(status.to_string())
    .bind(notes)
    .bind(completed_at)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_removal_request(pool, id).await
}

fn parse_request_from_row(row: sqlx::sqlite::SqliteRow) -> Result<RemovalRequest, sqlx::Error> {
    let status_str: String = row.try_get("status")?;

    let action_required = row
        .try_get::<Option<String>, _>("action_required")?
        .as_deref()
        .and_then(ActionRequired::parse);

    let created_at_str: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .with_timezone(&Utc);

    let submitted_at = row
        .try_get::<Option<String>, _>("submitted_at")?
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    let completed_at = row
        .try_get::<Option<String>, _>("completed_at")?
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(RemovalRequest {
        id: row.try_get("id")?,
        exposure_id: row.try_get("exposure_id")?,
        status: RemovalStatus::parse(&status_str),
        action_required,
        notes: row.try_get("notes")?,
        retry_count: row.try_get("retry_count")?,
        created_at,
        submitted_at,
        completed_at,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{exposures, scans, users, Database};

    async fn setup_exposure() -> (Database, String, String) {
        let db = Database::new(":memory:", 1).await.expect("create database");
        db.run_migrations().await.expect("run migrations");

        let user = users::create_user(
            db.pool(),
            users::NewUser {
                first_name: "Jane".to_string(),
                last_name: "Roe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "555-0101".to_string(),
                date_of_birth: "1990-01-01".to_string(),
                current_address: "1 Elm St".to_string(),
                city: "Portland".to_string(),
                state: "OR".to_string(),
                zip_code: "97201".to_string(),
                previous_addresses: None,
            },
        )
        .await
        .expect("create user");

        let scan = scans::create_scan(db.pool(), user.id)
            .await
            .expect("create scan");

        let exposure = exposures::create_exposure(
            db.pool(),
            exposures::NewExposure {
                scan_id: scan.id.clone(),
                broker_id: "whitepages".to_string(),
                exposed_data: vec!["Full Name".to_string()],
                profile_url: None,
            },
        )
        .await
        .expect("create exposure");

        (db, scan.id, exposure.id)
    }

    #[tokio::test]
    async fn test_create_starts_pending() {
        let (db, _scan_id, exposure_id) = setup_exposure().await;

        let request = create_removal_request(db.pool(), exposure_id)
            .await
            .expect("create request");
        assert_eq!(request.status, RemovalStatus::Pending);
        assert_eq!(request.retry_count, 0);
        assert!(request.submitted_at.is_none());
    }

    #[tokio::test]
    async fn test_classification_stamps_timestamps() {
        let (db, scan_id, exposure_id) = setup_exposure().await;
        let request = create_removal_request(db.pool(), exposure_id)
            .await
            .expect("create request");

        classify_request(
            db.pool(),
            &request.id,
            RemovalStatus::Completed,
            None,
            "Data successfully removed from broker database",
        )
        .await
        .expect("classify");

        let requests = get_by_scan_id(db.pool(), &scan_id).await.expect("query");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].status, RemovalStatus::Completed);
        assert!(requests[0].submitted_at.is_some());
        assert!(requests[0].completed_at.is_some());
    }

    #[tokio::test]
    async fn test_action_required_roundtrips() {
        let (db, _scan_id, exposure_id) = setup_exposure().await;
        let request = create_removal_request(db.pool(), exposure_id)
            .await
            .expect("create request");

        classify_request(
            db.pool(),
            &request.id,
            RemovalStatus::ActionRequired,
            Some(ActionRequired::IdVerification),
            "Broker requires government ID verification to complete removal",
        )
        .await
        .expect("classify");

        let loaded = get_removal_request(db.pool(), &request.id)
            .await
            .expect("query")
            .expect("request exists");
        assert_eq!(loaded.status, RemovalStatus::ActionRequired);
        assert_eq!(
            loaded.action_required,
            Some(ActionRequired::IdVerification)
        );
        assert!(loaded.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_status_override() {
        let (db, _scan_id, exposure_id) = setup_exposure().await;
        let request = create_removal_request(db.pool(), exposure_id)
            .await
            .expect("create request");

        let updated = apply_status_override(
            db.pool(),
            &request.id,
            RemovalStatus::Completed,
            Some("confirmed by operator".to_string()),
        )
        .await
        .expect("override")
        .expect("request exists");

        assert_eq!(updated.status, RemovalStatus::Completed);
        assert_eq!(updated.notes.as_deref(), Some("confirmed by operator"));
        assert!(updated.completed_at.is_some());
    }

    #[tokio::test]
    async fn test_status_only_override_keeps_engine_notes() {
        let (db, _scan_id, exposure_id) = setup_exposure().await;
        let request = create_removal_request(db.pool(), exposure_id)
            .await
            .expect("create request");

        classify_request(
            db.pool(),
            &request.id,
            RemovalStatus::InProgress,
            None,
            "Removal request submitted successfully, awaiting broker response",
        )
        .await
        .expect("classify");

        let updated =
            apply_status_override(db.pool(), &request.id, RemovalStatus::Completed, None)
                .await
                .expect("override")
                .expect("request exists");

        assert_eq!(updated.status, RemovalStatus::Completed);
        assert_eq!(
            updated.notes.as_deref(),
            Some("Removal request submitted successfully, awaiting broker response")
        );
    }

    #[tokio::test]
    async fn test_override_of_missing_request_returns_none() {
        let (db, _scan_id, _exposure_id) = setup_exposure().await;

        let result = apply_status_override(
            db.pool(),
            "no-such-request",
            RemovalStatus::Completed,
            None,
        )
        .await
        .expect("override");
        assert!(result.is_none());
    }
}
