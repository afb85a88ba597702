//! Removal process and removal-form handlers.

use crate::api::resolve_owned_scan;
use crate::error::ApiError;
use crate::session::AuthUser;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use delist_db::{exposures, scans, users, RemovalRequest, RemovalStatus};
use delist_removal::{generate_removal_letter, RemovalProgress};
use serde::{Deserialize, Serialize};

/// Acknowledgement body for fire-and-forget endpoints.
#[derive(Debug, Serialize)]
pub struct Ack {
    /// Human-readable confirmation.
    pub message: &'static str,
}

/// POST /api/scans/{scan_id}/remove
///
/// Creates the pending removal requests for every exposure of the scan and
/// kicks off their classification in the background.
pub async fn start_removal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(scan_id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    resolve_owned_scan(&state, &scan_id, &auth).await?;

    state.removal.start_removal_process(&scan_id).await?;
    Ok(Json(Ack {
        message: "Removal process started",
    }))
}

/// GET /api/scans/{scan_id}/removal-progress
pub async fn removal_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(scan_id): Path<String>,
) -> Result<Json<RemovalProgress>, ApiError> {
    resolve_owned_scan(&state, &scan_id, &auth).await?;

    let progress = state.removal.get_removal_progress(&scan_id).await?;
    Ok(Json(progress))
}

/// Body of PATCH /api/removal-requests/{request_id}.
#[derive(Debug, Deserialize)]
pub struct UpdateRemovalRequest {
    /// New status for the request.
    pub status: RemovalStatus,
    /// Optional replacement notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// PATCH /api/removal-requests/{request_id}
pub async fn update_request(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
    Json(body): Json<UpdateRemovalRequest>,
) -> Result<Json<RemovalRequest>, ApiError> {
    let updated = state
        .removal
        .update_removal_status(&request_id, body.status, body.notes)
        .await?
        .ok_or(ApiError::NotFound("Removal request"))?;

    Ok(Json(updated))
}

/// Broker details included in the removal form payload.
#[derive(Debug, Serialize)]
pub struct RemovalFormBroker {
    /// Broker name
    pub name: String,
    /// Broker website URL
    pub url: String,
    /// Opt-out page URL, if the broker has one
    pub opt_out_url: Option<String>,
    /// Description of the opt-out process
    pub opt_out_process: String,
    /// Estimated processing time
    pub estimated_processing_time: String,
    /// Removal difficulty on a 1-5 scale
    pub difficulty_rating: u8,
}

/// User details included in the removal form payload.
#[derive(Debug, Serialize)]
pub struct RemovalFormUser {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Full display name
    pub full_name: String,
    /// Email address
    pub email: String,
    /// Phone number
    pub phone: String,
    /// Date of birth
    pub date_of_birth: String,
    /// Current street address
    pub current_address: String,
    /// City
    pub city: String,
    /// State
    pub state: String,
    /// ZIP code
    pub zip_code: String,
    /// Optional previous addresses
    pub previous_addresses: Option<String>,
}

/// Response of GET /api/exposures/{exposure_id}/removal-form.
#[derive(Debug, Serialize)]
pub struct RemovalForm {
    /// The broker the form is addressed to
    pub broker: RemovalFormBroker,
    /// The user's own details, prefilled
    pub user_data: RemovalFormUser,
    /// Labels of the exposed data types
    pub exposed_data: Vec<String>,
    /// Profile URL on the broker's site, if known
    pub profile_url: Option<String>,
    /// Information the broker requires for an opt-out
    pub required_info: Vec<String>,
    /// The rendered removal letter
    pub form_template: String,
}

/// GET /api/exposures/{exposure_id}/removal-form
///
/// Ownership is derived through exposure to scan to user; a caller who does
/// not own the scan gets a 403 before any form data is assembled.
pub async fn removal_form(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(exposure_id): Path<String>,
) -> Result<Json<RemovalForm>, ApiError> {
    let exposure = exposures::get_exposure(state.db.pool(), &exposure_id)
        .await?
        .ok_or(ApiError::NotFound("Exposure"))?;

    let broker = state
        .catalog
        .get(&exposure.broker_id)
        .ok_or(ApiError::NotFound("Data broker"))?;

    let scan = scans::get_scan(state.db.pool(), &exposure.scan_id)
        .await?
        .ok_or(ApiError::NotFound("Scan"))?;

    if scan.user_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    let user = users::get_user(state.db.pool(), &scan.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let form_template = generate_removal_letter(broker, &user, &exposure);

    Ok(Json(RemovalForm {
        broker: RemovalFormBroker {
            name: broker.name.clone(),
            url: broker.url.clone(),
            opt_out_url: broker.opt_out_url.clone(),
            opt_out_process: broker.opt_out_process.clone(),
            estimated_processing_time: broker.estimated_processing_time.clone(),
            difficulty_rating: broker.difficulty_rating,
        },
        user_data: RemovalFormUser {
            full_name: user.full_name(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
            date_of_birth: user.date_of_birth,
            current_address: user.current_address,
            city: user.city,
            state: user.state,
            zip_code: user.zip_code,
            previous_addresses: user.previous_addresses,
        },
        exposed_data: exposure.exposed_data,
        profile_url: exposure.profile_url,
        required_info: broker.required_info.clone(),
        form_template,
    }))
}
