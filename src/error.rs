//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Malformed input: null, missing or oversized key/value
    #[error("{0}")]
    Validation(String),

    /// Key absent on get
    #[error("Key not found.")]
    NotFound,

    /// Internal fault during an eviction sweep, never surfaced to callers
    #[error("Eviction failed: {0}")]
    Eviction(String),

    /// Request the gateway could not decode or route
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Shorthand for a validation failure with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        CacheError::Validation(message.into())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Validation(_) | CacheError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound => StatusCode::NOT_FOUND,
            CacheError::Eviction(_) | CacheError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, CacheError>;
