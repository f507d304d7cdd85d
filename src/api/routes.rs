//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_handler, health_handler, put_handler, stats_handler, unsupported_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /get?key=...` - Retrieve a value by key
/// - `POST /put` - Insert or update a key-value pair
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
///
/// Unknown paths and wrong methods answer with an `ERROR` body instead of
/// an empty 404/405.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/get", get(get_handler).fallback(unsupported_handler))
        .route("/put", post(put_handler).fallback(unsupported_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .fallback(unsupported_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
