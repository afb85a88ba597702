//! Scan handlers.

use crate::api::resolve_owned_scan;
use crate::error::ApiError;
use crate::session::AuthUser;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use delist_db::{users, Scan};
use delist_scanner::ScanResults;
use serde::Deserialize;

/// Body of POST /api/scans.
#[derive(Debug, Deserialize)]
pub struct StartScanRequest {
    /// Id of the user to scan for; must be the authenticated caller.
    #[serde(default)]
    pub user_id: Option<String>,
}

/// POST /api/scans
///
/// Starts a scan for the caller and returns the running scan handle; the
/// scan itself continues in the background.
pub async fn start_scan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<StartScanRequest>,
) -> Result<Json<Scan>, ApiError> {
    let user_id = body
        .user_id
        .ok_or_else(|| ApiError::Validation("User ID is required".to_string()))?;

    if user_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    users::get_user(state.db.pool(), &user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let scan = state.scanner.start_scan(user_id).await?;
    Ok(Json(scan))
}

/// GET /api/users/{user_id}/latest-scan
pub async fn latest_scan(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Scan>, ApiError> {
    if user_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    let scan = state
        .scanner
        .get_user_latest_scan(&user_id)
        .await?
        .ok_or(ApiError::NotFound("Scan"))?;

    Ok(Json(scan))
}

/// GET /api/scans/{scan_id}/results
pub async fn scan_results(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(scan_id): Path<String>,
) -> Result<Json<ScanResults>, ApiError> {
    resolve_owned_scan(&state, &scan_id, &auth).await?;

    let results = state
        .scanner
        .get_scan_results(&scan_id)
        .await?
        .ok_or(ApiError::NotFound("Scan"))?;

    Ok(Json(results))
}
