//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::debug;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    GetQuery, GetResponse, HealthResponse, PutRequest, PutResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The store is created once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Sharded cache store
    pub store: Arc<CacheStore>,
}

impl AppState {
    /// Creates a new AppState around an existing store.
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store }
    }

    /// Creates a new AppState with a store sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(CacheStore::from_config(config)))
    }
}

/// Runs a store call on the blocking pool.
///
/// Store calls may wait on shard or eviction locks and must not park the
/// I/O threads while doing so.
async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CacheError::Internal(err.to_string()))?
}

/// Handler for GET /get?key=...
///
/// Retrieves a value from the cache by key. Only the first `key` parameter
/// is used when it repeats.
pub async fn get_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<GetResponse>> {
    let Query(pairs) = query.map_err(|err| CacheError::BadRequest(err.body_text()))?;
    let key = GetQuery::from_pairs(pairs).key()?.to_owned();

    let store = state.store.clone();
    let (key, value) = run_blocking(move || {
        let value = store.get(&key)?;
        Ok((key, value))
    })
    .await?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for POST /put
///
/// Inserts or updates a key-value pair from a JSON body.
pub async fn put_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PutResponse>> {
    let req = PutRequest::from_body(&body)?;

    let store = state.store.clone();
    run_blocking(move || {
        let (key, value) = req.validate()?;
        store.put(key, value)
    })
    .await?;

    Ok(Json(PutResponse::new()))
}

/// Handler for GET /stats
///
/// Returns current counter readings.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: state.store.stats(),
        shard_count: state.store.shard_count(),
    })
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Fallback for unknown routes and methods.
pub async fn unsupported_handler() -> CacheError {
    debug!("Rejected request to unsupported endpoint or method");
    CacheError::BadRequest("Unsupported endpoint or method".to_string())
}
