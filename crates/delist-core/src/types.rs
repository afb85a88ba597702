//! Shared types used across the Delist service.
//!
//! This module defines common newtypes that provide type safety and clear
//! domain modeling.

use crate::error::DelistError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for broker identifiers with validation.
///
/// Broker IDs are the catalog slugs (e.g. "whitepages", "spokeo"):
/// lowercase alphanumeric with hyphens, 3-50 characters. Deserialization
/// goes through the same validation as [`BrokerId::new`], so a malformed
/// slug in a seed document or API payload is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct BrokerId(String);

impl BrokerId {
    /// Create a new `BrokerId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID doesn't match the required format.
    pub fn new(id: impl Into<String>) -> Result<Self, DelistError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate broker ID format: lowercase alphanumeric with hyphens, 3-50 chars.
    fn validate(id: &str) -> Result<(), DelistError> {
        static BROKER_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = BROKER_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").expect("valid regex"));

        if id.len() < 3 || id.len() > 50 {
            return Err(DelistError::Validation(format!(
                "invalid broker ID: must be 3-50 characters, got {} characters",
                id.len()
            )));
        }

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(DelistError::Validation(format!(
                "invalid broker ID: must be lowercase alphanumeric with hyphens, got '{id}'"
            )))
        }
    }
}

impl TryFrom<String> for BrokerId {
    type Error = DelistError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl fmt::Display for BrokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generate a new random record identifier (UUID v4, string form).
///
/// Used for user, scan, exposure and removal-request ids.
#[must_use]
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
