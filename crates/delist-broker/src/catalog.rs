//! Ordered in-memory broker catalog.
//!
//! The catalog preserves seed order: the scan engine's deterministic
//! found-decision is a function of a broker's 0-based position in this list,
//! so two catalogs with the same records in the same order always produce
//! identical scans.

use crate::error::{CatalogError, Result};
use crate::record::BrokerRecord;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

/// The embedded seed document: the fixed list of broker sites the service
/// pretends to scan.
const SEED_TOML: &str = include_str!("../brokers.toml");

/// Read-only, ordered collection of broker records.
#[derive(Debug, Clone)]
pub struct BrokerCatalog {
    records: Vec<BrokerRecord>,
    index: HashMap<String, usize>,
}

#[derive(Deserialize)]
struct SeedDocument {
    #[serde(rename = "broker", default)]
    brokers: Vec<BrokerRecord>,
}

impl BrokerCatalog {
    /// Build a catalog from an ordered list of records.
    ///
    /// Every record is validated and IDs must be unique.
    ///
    /// # Errors
    /// Returns error on a validation failure or a duplicate ID.
    pub fn from_records(records: Vec<BrokerRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            record.validate()?;
            if index
                .insert(record.id.as_str().to_string(), position)
                .is_some()
            {
                return Err(CatalogError::DuplicateId {
                    broker_id: record.id.to_string(),
                });
            }
        }

        Ok(Self { records, index })
    }

    /// Parse a catalog from a TOML document.
    ///
    /// # Errors
    /// Returns error if the document is not valid TOML or a record fails
    /// validation.
    pub fn from_toml(document: &str) -> Result<Self> {
        let seed: SeedDocument = toml::from_str(document)?;
        Self::from_records(seed.brokers)
    }

    /// Load the embedded seed catalog.
    ///
    /// # Errors
    /// Returns error if the embedded document fails to parse or validate
    /// (a packaging defect, not a runtime condition).
    pub fn load_seed() -> Result<Self> {
        let catalog = Self::from_toml(SEED_TOML)?;
        info!(count = catalog.len(), "loaded broker catalog");
        Ok(catalog)
    }

    /// Look up a broker by its ID.
    #[must_use]
    pub fn get(&self, broker_id: &str) -> Option<&BrokerRecord> {
        self.index
            .get(broker_id)
            .map(|&position| &self.records[position])
    }

    /// All records, in seed order.
    #[must_use]
    pub fn records(&self) -> &[BrokerRecord] {
        &self.records
    }

    /// Number of brokers in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BrokerCategory, BrokerPriority};
    use delist_core::BrokerId;

    fn record(id: &str) -> BrokerRecord {
        BrokerRecord {
            id: BrokerId::new(id).expect("valid id"),
            name: id.to_string(),
            url: format!("https://{id}.example.com"),
            category: BrokerCategory::PeopleSearch,
            priority: BrokerPriority::Low,
            opt_out_url: None,
            opt_out_process: "Submit the form".to_string(),
            required_info: vec![],
            estimated_processing_time: "24 hours".to_string(),
            difficulty_rating: 1,
        }
    }

    #[test]
    fn preserves_insertion_order() {
        let catalog =
            BrokerCatalog::from_records(vec![record("zeta"), record("alpha"), record("midway")])
                .expect("build catalog");

        let ids: Vec<_> = catalog.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "midway"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = BrokerCatalog::from_records(vec![record("spokeo"), record("spokeo")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId { .. })));
    }

    #[test]
    fn lookup_by_id() {
        let catalog = BrokerCatalog::from_records(vec![record("alpha"), record("beta")])
            .expect("build catalog");
        assert_eq!(catalog.get("beta").map(|r| r.name.as_str()), Some("beta"));
        assert!(catalog.get("gamma").is_none());
    }

    #[test]
    fn rejects_malformed_broker_id_in_toml() {
        let document = r#"
            [[broker]]
            id = "Bad Slug"
            name = "Bad Slug"
            url = "https://bad.example.com"
            category = "people-search"
            priority = "low"
            opt_out_process = "Submit the form"
            required_info = []
            estimated_processing_time = "24 hours"
            difficulty_rating = 1
        "#;
        assert!(matches!(
            BrokerCatalog::from_toml(document),
            Err(CatalogError::ParseError(_))
        ));
    }

    #[test]
    fn seed_catalog_loads_and_is_ordered() {
        let catalog = BrokerCatalog::load_seed().expect("load seed catalog");
        assert_eq!(catalog.len(), 20);

        // The first entry drives scan index 0 and must stay stable.
        let first = &catalog.records()[0];
        assert_eq!(first.id.as_str(), "whitepages");
        assert_eq!(first.priority, BrokerPriority::High);
        assert_eq!(first.difficulty_rating, 2);
    }

    #[test]
    fn seed_catalog_difficulties_are_in_range() {
        let catalog = BrokerCatalog::load_seed().expect("load seed catalog");
        for record in catalog.records() {
            assert!((1..=5).contains(&record.difficulty_rating), "{}", record.id);
        }
    }
}
