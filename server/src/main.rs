//! Delist server entry point.

use anyhow::Result;
use delist_broker::BrokerCatalog;
use delist_core::AppConfig;
use delist_db::Database;
use delist_server::{api, AppState};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delist_server=debug,tower_http=debug".into()),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = AppConfig::load_with_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Delist server"
    );

    let db = Database::new(&config.database.path, config.database.max_connections).await?;
    db.run_migrations().await?;

    let catalog = Arc::new(BrokerCatalog::load_seed()?);
    info!(broker_count = catalog.len(), "broker catalog loaded");

    let state = AppState::new(db, catalog, &config);
    let router = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    info!(addr = %config.server.bind_addr, "listening");
    axum::serve(listener, router).await?;

    Ok(())
}
