//! API error types and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by API handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or unacceptable request input.
    #[error("{0}")]
    Validation(String),

    /// No valid session cookie presented.
    #[error("Authentication required")]
    Unauthorized,

    /// The caller is not the owner of the requested resource.
    #[error("Forbidden - you can only access your own data")]
    Forbidden,

    /// The named resource does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Database query failure.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// Database open or migration failure.
    #[error("Storage error")]
    Gateway(#[from] delist_db::DatabaseError),

    /// Scan engine failure.
    #[error("Scan engine error")]
    Scan(#[from] delist_scanner::ScanError),

    /// Removal engine failure.
    #[error("Removal engine error")]
    Removal(#[from] delist_removal::RemovalError),
}

/// Error response body for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable error message.
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Database(_) | Self::Gateway(_) | Self::Scan(_) | Self::Removal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
