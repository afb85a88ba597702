//! Delist Broker - the static data-broker catalog.
//!
//! This crate defines the broker record types, their validation rules, and
//! the ordered in-memory catalog the engines iterate. The catalog is seeded
//! from an embedded TOML document and is read-only at runtime; its iteration
//! order is the seed order and is semantically significant (the scan engine's
//! deterministic found-decision is a function of the catalog index).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
pub mod error;
pub mod record;

// Re-export commonly used types
pub use catalog::BrokerCatalog;
pub use delist_core::BrokerId;
pub use error::{CatalogError, Result};
pub use record::{BrokerCategory, BrokerPriority, BrokerRecord};
