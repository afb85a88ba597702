//! Configuration management for Delist.
//!
//! Provides TOML-based configuration loaded from an explicit path with
//! environment variable overrides for deployment.

use crate::error::ConfigResult;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main application configuration.
///
/// Loaded from the file named by `DELIST_CONFIG` (default `delist.toml` in
/// the working directory). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Database settings
    pub database: DatabaseConfig,
    /// Scan engine behavior settings
    pub scanning: ScanningConfig,
    /// Removal engine behavior settings
    pub removal: RemovalConfig,
}

impl AppConfig {
    /// Load configuration from the given path, falling back to defaults if
    /// the file is not present.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();

        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// The config path itself comes from `DELIST_CONFIG` (default
    /// `delist.toml`). Supported overrides:
    /// - `DELIST_BIND_ADDR`: server bind address
    /// - `DELIST_DATABASE_PATH`: SQLite database path
    /// - `DELIST_BROKER_DELAY_MS`: per-broker scan delay
    /// - `DELIST_REQUEST_DELAY_MS`: per-request removal delay
    pub fn load_with_env() -> ConfigResult<Self> {
        let path = std::env::var("DELIST_CONFIG").unwrap_or_else(|_| "delist.toml".to_string());
        let mut config = Self::load(path)?;

        if let Ok(val) = std::env::var("DELIST_BIND_ADDR") {
            tracing::debug!("Override server.bind_addr from env: {}", val);
            config.server.bind_addr = val;
        }

        if let Ok(val) = std::env::var("DELIST_DATABASE_PATH") {
            tracing::debug!("Override database.path from env: {}", val);
            config.database.path = val;
        }

        if let Ok(val) = std::env::var("DELIST_BROKER_DELAY_MS") {
            if let Ok(ms) = val.parse() {
                config.scanning.broker_delay_ms = ms;
                tracing::debug!("Override scanning.broker_delay_ms from env: {}", ms);
            }
        }

        if let Ok(val) = std::env::var("DELIST_REQUEST_DELAY_MS") {
            if let Ok(ms) = val.parse() {
                config.removal.request_delay_ms = ms;
                tracing::debug!("Override removal.request_delay_ms from env: {}", ms);
            }
        }

        Ok(config)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind the HTTP listener to
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file (or `:memory:`)
    pub path: String,
    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "delist.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Scan engine behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Simulated per-broker delay in milliseconds.
    ///
    /// Serializes progress updates so pollers observe counters advancing one
    /// broker at a time. Carries no semantic weight beyond sequencing.
    pub broker_delay_ms: u64,
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            broker_delay_ms: 100,
        }
    }
}

/// Removal engine behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemovalConfig {
    /// Simulated per-request classification delay in milliseconds.
    pub request_delay_ms: u64,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1500,
        }
    }
}
