//! Delist Core - Foundation crate for the Delist privacy service.
//!
//! This crate provides shared types, error handling, and configuration
//! management that all other Delist crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with environment overrides
//! - [`types`] - Shared newtypes (`BrokerId`)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, DatabaseConfig, RemovalConfig, ScanningConfig, ServerConfig};
pub use error::{ConfigError, ConfigResult, DelistError, Result};
pub use types::BrokerId;
