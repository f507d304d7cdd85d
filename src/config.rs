//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Number of independently locked shards (rounded up to a power of two)
    pub shard_count: usize,
    /// Entry count above which an eviction pass is triggered
    pub max_entries: usize,
    /// Memory usage ratio above which an eviction pass is triggered
    pub memory_threshold: f64,
    /// Maximum number of entries removed by a single eviction pass
    pub eviction_batch_size: usize,
    /// Memory monitor tick interval in milliseconds
    pub memory_check_interval_ms: u64,
    /// Memory budget used as the ratio denominator, None = total system memory
    pub memory_limit_bytes: Option<u64>,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHARD_COUNT` - Number of shards (default: 512)
    /// - `MAX_ENTRIES` - Entry count eviction trigger (default: 5000000)
    /// - `MEMORY_THRESHOLD` - Memory ratio eviction trigger (default: 0.7)
    /// - `EVICTION_BATCH_SIZE` - Entries removed per pass (default: 5000)
    /// - `MEMORY_CHECK_INTERVAL_MS` - Monitor interval (default: 1000)
    /// - `MEMORY_LIMIT_BYTES` - Memory budget (default: system memory)
    /// - `SERVER_PORT` - HTTP server port (default: 8181)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            shard_count: env_or("SHARD_COUNT", defaults.shard_count),
            max_entries: env_or("MAX_ENTRIES", defaults.max_entries),
            memory_threshold: env_or("MEMORY_THRESHOLD", defaults.memory_threshold),
            eviction_batch_size: env_or("EVICTION_BATCH_SIZE", defaults.eviction_batch_size),
            memory_check_interval_ms: env_or(
                "MEMORY_CHECK_INTERVAL_MS",
                defaults.memory_check_interval_ms,
            ),
            memory_limit_bytes: env::var("MEMORY_LIMIT_BYTES")
                .ok()
                .and_then(|v| v.parse().ok()),
            server_port: env_or("SERVER_PORT", defaults.server_port),
        }
    }

    /// Interval between memory monitor ticks.
    pub fn memory_check_interval(&self) -> Duration {
        Duration::from_millis(self.memory_check_interval_ms.max(1))
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: 512,
            max_entries: 5_000_000,
            memory_threshold: 0.7,
            eviction_batch_size: 5000,
            memory_check_interval_ms: 1000,
            memory_limit_bytes: None,
            server_port: 8181,
        }
    }
}
