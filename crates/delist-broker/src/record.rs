//! Broker record types and validation.
//!
//! A `BrokerRecord` is a single entry in the static catalog: the site's
//! opt-out metadata plus the priority and difficulty ratings that drive the
//! simulated scan and removal decisions.

use crate::error::{CatalogError, Result};
use delist_core::BrokerId;
use serde::{Deserialize, Serialize};

/// A single data-broker entry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerRecord {
    /// Unique broker identifier (e.g. "spokeo", "beenverified")
    pub id: BrokerId,

    /// Human-readable broker name
    pub name: String,

    /// Broker website URL
    pub url: String,

    /// Broker category
    pub category: BrokerCategory,

    /// Scan priority (drives the deterministic found-decision)
    pub priority: BrokerPriority,

    /// URL of the broker's opt-out page, if it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opt_out_url: Option<String>,

    /// Human-readable description of the opt-out process
    pub opt_out_process: String,

    /// Labels of the information the broker requires for an opt-out
    pub required_info: Vec<String>,

    /// Free-text estimate of the broker's processing time
    pub estimated_processing_time: String,

    /// Removal difficulty on a 1-5 scale
    pub difficulty_rating: u8,
}

impl BrokerRecord {
    /// Validate the record for completeness and correctness.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(CatalogError::ValidationError {
                broker_id: self.id.to_string(),
                reason: "broker name cannot be empty".to_string(),
            });
        }

        if self.url.is_empty() {
            return Err(CatalogError::ValidationError {
                broker_id: self.id.to_string(),
                reason: "broker URL cannot be empty".to_string(),
            });
        }

        if self.difficulty_rating < 1 || self.difficulty_rating > 5 {
            return Err(CatalogError::ValidationError {
                broker_id: self.id.to_string(),
                reason: format!(
                    "difficulty_rating must be 1-5, got {}",
                    self.difficulty_rating
                ),
            });
        }

        Ok(())
    }
}

/// Categories of data brokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrokerCategory {
    /// People search engines (Spokeo, BeenVerified, etc.)
    PeopleSearch,
    /// Marketing data brokers
    Marketing,
    /// Financial/credit data
    Credit,
    /// Public records aggregators
    PublicRecords,
}

impl BrokerCategory {
    /// Get a human-readable display name.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PeopleSearch => "People Search",
            Self::Marketing => "Marketing",
            Self::Credit => "Credit",
            Self::PublicRecords => "Public Records",
        }
    }
}

/// Scan priority of a broker.
///
/// Priority feeds both the deterministic found-decision weight and the
/// removal outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerPriority {
    /// High-priority broker (most likely to hold the user's data)
    High,
    /// Medium-priority broker
    Medium,
    /// Low-priority broker
    Low,
}
