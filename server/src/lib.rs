//! Delist HTTP server.
//!
//! Wires the scan and removal engines, the broker catalog, and the
//! persistence gateway behind a small REST surface with cookie-session
//! authentication. Every scan- or exposure-scoped route re-derives the
//! owning user and refuses callers who are not that user.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod api;
pub mod error;
pub mod session;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
