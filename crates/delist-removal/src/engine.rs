//! Removal orchestration.
//!
//! A removal run creates one pending request per exposure of a scan, then
//! classifies each request strictly sequentially in a detached background
//! task. Progress is never maintained incrementally; every stats read
//! recomputes from the persisted requests, so pollers always see the
//! current truth no matter how far the task has got.

use crate::error::Result;
use crate::outcome;
use delist_broker::{BrokerCatalog, BrokerRecord};
use delist_db::{exposures, removal_requests, Database, Exposure, RemovalRequest, RemovalStatus};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Counts of removal requests per status for one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemovalStats {
    /// Total requests for the scan
    pub total: usize,
    /// Requests that finished successfully
    pub completed: usize,
    /// Requests submitted and awaiting the broker
    pub in_progress: usize,
    /// Requests not yet classified
    pub pending: usize,
    /// Requests blocked on a user verification step
    pub action_required: usize,
}

/// A removal request annotated with its exposure and catalog broker.
///
/// Either annotation is absent when the referenced record no longer
/// resolves.
#[derive(Debug, Clone, Serialize)]
pub struct RequestWithDetails {
    /// The removal request record
    #[serde(flatten)]
    pub request: RemovalRequest,
    /// The exposure the request remediates, if still present
    pub exposure: Option<Exposure>,
    /// The catalog broker, if still present
    pub broker: Option<BrokerRecord>,
}

/// Stats plus annotated requests for one scan's removal run.
#[derive(Debug, Clone, Serialize)]
pub struct RemovalProgress {
    /// Per-status counts
    pub stats: RemovalStats,
    /// Every request for the scan, in creation order
    pub requests: Vec<RequestWithDetails>,
}

/// Drives simulated removal runs against the broker catalog.
#[derive(Debug, Clone)]
pub struct RemovalEngine {
    db: Database,
    catalog: Arc<BrokerCatalog>,
    request_delay: Duration,
}

impl RemovalEngine {
    /// Create a removal engine over the given database and catalog.
    ///
    /// `request_delay` is the simulated per-request latency; tests pass
    /// zero.
    #[must_use]
    pub fn new(db: Database, catalog: Arc<BrokerCatalog>, request_delay: Duration) -> Self {
        Self {
            db,
            catalog,
            request_delay,
        }
    }

    /// Create a pending removal request per exposure of the scan, then
    /// classify them in a background task.
    ///
    /// Returns as soon as the pending requests exist; callers poll
    /// [`get_removal_progress`](Self::get_removal_progress) for the rest.
    ///
    /// # Errors
    /// Returns `RemovalError::Database` if the requests cannot be created.
    pub async fn start_removal_process(&self, scan_id: &str) -> Result<()> {
        let exposures = exposures::get_by_scan_id(self.db.pool(), scan_id).await?;
        tracing::info!(
            scan_id,
            exposure_count = exposures.len(),
            "starting removal process"
        );

        for exposure in exposures {
            removal_requests::create_removal_request(self.db.pool(), exposure.id).await?;
        }

        let engine = self.clone();
        let scan_id = scan_id.to_string();
        tokio::spawn(async move {
            if let Err(e) = engine.process_requests(&scan_id).await {
                tracing::error!(scan_id = %scan_id, error = %e, "removal run failed");
            }
        });

        Ok(())
    }

    /// Classify every removal request of the scan, one at a time.
    ///
    /// A request whose exposure or broker no longer resolves is skipped and
    /// stays pending. Public so tests can drive a run synchronously.
    ///
    /// # Errors
    /// Returns `RemovalError::Database` on any gateway failure.
    pub async fn process_requests(&self, scan_id: &str) -> Result<()> {
        let requests = removal_requests::get_by_scan_id(self.db.pool(), scan_id).await?;

        for request in requests {
            if !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let Some(exposure) =
                exposures::get_exposure(self.db.pool(), &request.exposure_id).await?
            else {
                tracing::warn!(
                    request_id = %request.id,
                    exposure_id = %request.exposure_id,
                    "exposure missing, leaving request pending"
                );
                continue;
            };

            let Some(broker) = self.catalog.get(&exposure.broker_id) else {
                tracing::warn!(
                    request_id = %request.id,
                    broker_id = %exposure.broker_id,
                    "broker missing from catalog, leaving request pending"
                );
                continue;
            };

            let outcome = outcome::classify(broker.difficulty_rating, broker.priority);
            removal_requests::classify_request(
                self.db.pool(),
                &request.id,
                outcome.status,
                outcome.action_required,
                outcome.notes,
            )
            .await?;
        }

        tracing::info!(scan_id, "removal run finished");
        Ok(())
    }

    /// Current removal progress for a scan.
    ///
    /// Stats are recomputed from the persisted requests on every call.
    ///
    /// # Errors
    /// Returns `RemovalError::Database` if a query fails.
    pub async fn get_removal_progress(&self, scan_id: &str) -> Result<RemovalProgress> {
        let requests = removal_requests::get_by_scan_id(self.db.pool(), scan_id).await?;

        let count =
            |status: RemovalStatus| requests.iter().filter(|r| r.status == status).count();
        let stats = RemovalStats {
            total: requests.len(),
            completed: count(RemovalStatus::Completed),
            in_progress: count(RemovalStatus::InProgress),
            pending: count(RemovalStatus::Pending),
            action_required: count(RemovalStatus::ActionRequired),
        };

        let mut annotated = Vec::with_capacity(requests.len());
        for request in requests {
            let exposure =
                exposures::get_exposure(self.db.pool(), &request.exposure_id).await?;
            let broker = exposure
                .as_ref()
                .and_then(|e| self.catalog.get(&e.broker_id))
                .cloned();
            annotated.push(RequestWithDetails {
                request,
                exposure,
                broker,
            });
        }

        Ok(RemovalProgress {
            stats,
            requests: annotated,
        })
    }

    /// Externally override a single request's status and notes.
    ///
    /// Moving to completed also stamps the completion time. Returns `None`
    /// if the request does not exist.
    ///
    /// # Errors
    /// Returns `RemovalError::Database` if the update fails.
    pub async fn update_removal_status(
        &self,
        request_id: &str,
        status: RemovalStatus,
        notes: Option<String>,
    ) -> Result<Option<RemovalRequest>> {
        let updated =
            removal_requests::apply_status_override(self.db.pool(), request_id, status, notes)
                .await?;
        Ok(updated)
    }
}
