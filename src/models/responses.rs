//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::CacheStats;

/// Outcome marker carried by every get/put response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// The call succeeded
    Ok,
    /// The call failed, see `message`
    Error,
}

/// Response body for the GET operation (GET /get?key=...)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// Always `OK`
    pub status: Status,
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the PUT operation (POST /put)
#[derive(Debug, Clone, Serialize)]
pub struct PutResponse {
    /// Always `OK`
    pub status: Status,
    /// Success message
    pub message: String,
}

impl PutResponse {
    /// Creates a new PutResponse
    pub fn new() -> Self {
        Self {
            status: Status::Ok,
            message: "Key inserted/updated successfully.".to_string(),
        }
    }
}

impl Default for PutResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Counter readings
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Number of shards in the store
    pub shard_count: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always `ERROR`
    pub status: Status,
    /// Error message describing what went wrong
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
        }
    }
}
