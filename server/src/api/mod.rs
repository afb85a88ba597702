//! REST API surface.
//!
//! Route handlers live in per-resource modules; this module assembles the
//! router and holds the ownership checks shared by the scan- and
//! exposure-scoped routes.

pub mod brokers;
pub mod removals;
pub mod scans;
pub mod users;

use crate::error::ApiError;
use crate::session::AuthUser;
use crate::state::AppState;
use axum::extract::State;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use delist_db::{scans as scan_queries, Scan};
use serde::Serialize;
use tower_http::trace::TraceLayer;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/users", post(users::register))
        .route("/api/users/by-email/{email}", get(users::get_by_email))
        .route("/api/users/{user_id}/latest-scan", get(scans::latest_scan))
        .route("/api/scans", post(scans::start_scan))
        .route("/api/scans/{scan_id}/results", get(scans::scan_results))
        .route("/api/scans/{scan_id}/remove", post(removals::start_removal))
        .route(
            "/api/scans/{scan_id}/removal-progress",
            get(removals::removal_progress),
        )
        .route(
            "/api/removal-requests/{request_id}",
            patch(removals::update_request),
        )
        .route("/api/data-brokers", get(brokers::list_brokers))
        .route("/api/data-brokers/{broker_id}", get(brokers::get_broker))
        .route(
            "/api/exposures/{exposure_id}/removal-form",
            get(removals::removal_form),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load a scan and verify the caller owns it.
///
/// Missing scan maps to 404, foreign scan to 403. Every scan-scoped route
/// goes through here so no handler can forget the check.
pub(crate) async fn resolve_owned_scan(
    state: &AppState,
    scan_id: &str,
    auth: &AuthUser,
) -> Result<Scan, ApiError> {
    let scan = scan_queries::get_scan(state.db.pool(), scan_id)
        .await?
        .ok_or(ApiError::NotFound("Scan"))?;

    if scan.user_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(scan)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Number of brokers in the catalog
    broker_count: usize,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        broker_count: state.catalog.len(),
    })
}
