//! Shard Cache - A sharded in-memory key-value cache server
//!
//! Provides concurrent get/put over independently locked shards, with a
//! background monitor that runs approximate LRU eviction under memory
//! pressure or when the entry count grows past its limit.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_memory_monitor;
