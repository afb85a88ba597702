//! Deterministic broker scan engine.
//!
//! Simulates scanning the data-broker catalog for a user's personal
//! information. All "findings" come from pure decision functions over the
//! catalog, so the same catalog always produces the same exposures and the
//! same privacy score.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod decision;
pub mod engine;
pub mod error;

pub use engine::{ExposureWithBroker, ScanEngine, ScanResults};
pub use error::{Result, ScanError};
