//! Broker catalog handlers. Public, no session required.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use delist_broker::BrokerRecord;

/// GET /api/data-brokers
pub async fn list_brokers(State(state): State<AppState>) -> Json<Vec<BrokerRecord>> {
    Json(state.catalog.records().to_vec())
}

/// GET /api/data-brokers/{broker_id}
pub async fn get_broker(
    State(state): State<AppState>,
    Path(broker_id): Path<String>,
) -> Result<Json<BrokerRecord>, ApiError> {
    let broker = state
        .catalog
        .get(&broker_id)
        .cloned()
        .ok_or(ApiError::NotFound("Data broker"))?;

    Ok(Json(broker))
}
