//! API Module
//!
//! HTTP handlers and routing for the cache server.
//!
//! # Endpoints
//! - `GET /get?key=...` - Retrieve a value by key
//! - `POST /put` - Insert or update a key-value pair
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint
//!
//! # Errors
//! Every failure answers with `{"status": "ERROR", "message": ...}`. The HTTP
//! status also follows the error class: 400 for validation failures,
//! undecodable requests and unsupported routes, 404 for a missing key, 500
//! for internal faults. Clients that only read the body `status` keep working.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
