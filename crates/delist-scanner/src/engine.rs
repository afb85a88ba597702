//! Scan orchestration.
//!
//! A scan walks the broker catalog strictly sequentially, one broker at a
//! time, persisting progress counters after every broker so pollers see
//! monotonic progress. The walk runs as a detached background task; the
//! caller gets the running scan handle back immediately and polls for
//! status.

use crate::decision;
use crate::error::{Result, ScanError};
use delist_broker::{BrokerCatalog, BrokerRecord};
use delist_db::{exposures, scans, users, Database, Exposure, NewExposure, Scan};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// An exposure annotated with its resolved catalog broker.
///
/// `broker` is absent when the catalog no longer carries the broker the
/// exposure was recorded against.
#[derive(Debug, Clone, Serialize)]
pub struct ExposureWithBroker {
    /// The exposure record
    #[serde(flatten)]
    pub exposure: Exposure,
    /// The catalog broker, if still present
    pub broker: Option<BrokerRecord>,
}

/// A finished or in-flight scan together with everything it found.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResults {
    /// The scan record
    pub scan: Scan,
    /// All exposures discovered by the scan, in discovery order
    pub exposures: Vec<ExposureWithBroker>,
}

/// Drives simulated scans over the broker catalog.
#[derive(Debug, Clone)]
pub struct ScanEngine {
    db: Database,
    catalog: Arc<BrokerCatalog>,
    broker_delay: Duration,
}

impl ScanEngine {
    /// Create a scan engine over the given database and catalog.
    ///
    /// `broker_delay` is the simulated per-broker latency; tests pass zero.
    #[must_use]
    pub fn new(db: Database, catalog: Arc<BrokerCatalog>, broker_delay: Duration) -> Self {
        Self {
            db,
            catalog,
            broker_delay,
        }
    }

    /// Start a scan for a user and return the running scan handle.
    ///
    /// The scan itself continues in a background task after this returns.
    /// If the task errors out the scan is marked failed rather than left
    /// running forever.
    ///
    /// # Errors
    /// Returns `ScanError::Database` if the scan row cannot be created.
    pub async fn start_scan(&self, user_id: String) -> Result<Scan> {
        let scan = scans::create_scan(self.db.pool(), user_id).await?;
        tracing::info!(scan_id = %scan.id, user_id = %scan.user_id, "starting scan");

        let engine = self.clone();
        let scan_id = scan.id.clone();
        tokio::spawn(async move {
            if let Err(e) = engine.run_scan(&scan_id).await {
                tracing::error!(scan_id = %scan_id, error = %e, "scan run failed");
                if let Err(e) =
                    scans::fail_scan(engine.db.pool(), &scan_id, &e.to_string()).await
                {
                    tracing::error!(scan_id = %scan_id, error = %e, "could not record scan failure");
                }
            }
        });

        Ok(scan)
    }

    /// Execute a scan run to completion.
    ///
    /// Public so tests can drive a scan synchronously; production callers go
    /// through [`start_scan`](Self::start_scan).
    ///
    /// # Errors
    /// Returns `ScanError` if the scan or its user is missing, or on any
    /// gateway failure. The caller (the spawned task) records the failure on
    /// the scan row.
    pub async fn run_scan(&self, scan_id: &str) -> Result<()> {
        let scan = scans::get_scan(self.db.pool(), scan_id)
            .await?
            .ok_or_else(|| ScanError::MissingScan {
                scan_id: scan_id.to_string(),
            })?;

        let user = users::get_user(self.db.pool(), &scan.user_id)
            .await?
            .ok_or_else(|| ScanError::MissingUser {
                user_id: scan.user_id.clone(),
            })?;

        let brokers = self.catalog.records();
        tracing::debug!(scan_id, broker_count = brokers.len(), "scanning catalog");

        let mut sites_scanned: i64 = 0;
        let mut sites_found: i64 = 0;

        for (i, broker) in brokers.iter().enumerate() {
            if !self.broker_delay.is_zero() {
                tokio::time::sleep(self.broker_delay).await;
            }

            sites_scanned += 1;

            if decision::exposure_found(i, broker.priority) {
                sites_found += 1;

                exposures::create_exposure(
                    self.db.pool(),
                    NewExposure {
                        scan_id: scan.id.clone(),
                        broker_id: broker.id.to_string(),
                        exposed_data: decision::exposed_data(&broker.required_info),
                        profile_url: Some(format!(
                            "{}/profile/{}-{}",
                            broker.url, user.first_name, user.last_name
                        )),
                    },
                )
                .await?;
            }

            scans::update_progress(self.db.pool(), &scan.id, sites_scanned, sites_found).await?;
        }

        let found = exposures::get_by_scan_id(self.db.pool(), &scan.id).await?;
        let score = decision::privacy_score(found.len(), brokers.len());
        scans::complete_scan(self.db.pool(), &scan.id, score).await?;

        tracing::info!(
            scan_id,
            sites_found,
            privacy_score = score,
            "scan completed"
        );
        Ok(())
    }

    /// The most recently started scan for a user, if any.
    ///
    /// # Errors
    /// Returns `ScanError::Database` if the query fails.
    pub async fn get_user_latest_scan(&self, user_id: &str) -> Result<Option<Scan>> {
        let mut scans = scans::get_by_user_id(self.db.pool(), user_id).await?;
        if scans.is_empty() {
            return Ok(None);
        }
        Ok(Some(scans.remove(0)))
    }

    /// A scan plus everything it found, with brokers resolved from the
    /// catalog. `None` if the scan does not exist.
    ///
    /// # Errors
    /// Returns `ScanError::Database` if a query fails.
    pub async fn get_scan_results(&self, scan_id: &str) -> Result<Option<ScanResults>> {
        let Some(scan) = scans::get_scan(self.db.pool(), scan_id).await? else {
            return Ok(None);
        };

        let exposures = exposures::get_by_scan_id(self.db.pool(), scan_id)
            .await?
            .into_iter()
            .map(|exposure| {
                let broker = self.catalog.get(&exposure.broker_id).cloned();
                ExposureWithBroker { exposure, broker }
            })
            .collect();

        Ok(Some(ScanResults { scan, exposures }))
    }
}
