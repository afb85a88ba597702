//! Error types for the broker catalog.

use thiserror::Error;

/// Errors that can occur in catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Broker record not found in the catalog
    #[error("broker not found: {broker_id}")]
    NotFound {
        /// The broker ID that was not found
        broker_id: String,
    },

    /// Failed to parse the catalog seed TOML
    #[error("failed to parse broker catalog TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid broker record (validation failed)
    #[error("invalid broker record for {broker_id}: {reason}")]
    ValidationError {
        /// Broker ID being validated
        broker_id: String,
        /// Reason for validation failure
        reason: String,
    },

    /// Two catalog records share the same ID
    #[error("duplicate broker ID in catalog: {broker_id}")]
    DuplicateId {
        /// The duplicated broker ID
        broker_id: String,
    },
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
