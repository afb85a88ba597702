//! Removal request engine and opt-out letter generator.
//!
//! Simulates submitting removal requests to the brokers that exposed a
//! user's data. Outcomes are a pure function of the broker's difficulty and
//! priority, so runs over the same catalog always classify the same way.
//! Also renders the opt-out letter a user can send to a broker themselves.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod engine;
pub mod error;
pub mod letter;
pub mod outcome;

pub use engine::{RemovalEngine, RemovalProgress, RemovalStats, RequestWithDetails};
pub use error::{RemovalError, Result};
pub use letter::generate_removal_letter;
pub use outcome::{classify, RemovalOutcome};
