//! Shared application state.

use crate::session::SessionStore;
use delist_broker::BrokerCatalog;
use delist_core::AppConfig;
use delist_db::Database;
use delist_removal::RemovalEngine;
use delist_scanner::ScanEngine;
use std::sync::Arc;
use std::time::Duration;

/// Everything a handler needs, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    /// Persistence gateway handle.
    pub db: Database,
    /// The static broker catalog.
    pub catalog: Arc<BrokerCatalog>,
    /// Scan engine.
    pub scanner: ScanEngine,
    /// Removal engine.
    pub removal: RemovalEngine,
    /// In-memory session store.
    pub sessions: SessionStore,
}

impl AppState {
    /// Assemble the application state from its parts, with engine delays
    /// taken from the configuration.
    #[must_use]
    pub fn new(db: Database, catalog: Arc<BrokerCatalog>, config: &AppConfig) -> Self {
        let scanner = ScanEngine::new(
            db.clone(),
            Arc::clone(&catalog),
            Duration::from_millis(config.scanning.broker_delay_ms),
        );
        let removal = RemovalEngine::new(
            db.clone(),
            Arc::clone(&catalog),
            Duration::from_millis(config.removal.request_delay_ms),
        );

        Self {
            db,
            catalog,
            scanner,
            removal,
            sessions: SessionStore::new(),
        }
    }
}
