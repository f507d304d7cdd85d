//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with access tracking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

// == Cache Entry ==
/// Represents a single cache entry with value and access metadata.
///
/// The value and the last access time are updated independently of each
/// other: a reader may observe a new value paired with the previous access
/// time. The value itself is always swapped as a whole.
#[derive(Debug)]
pub struct CacheEntry {
    /// The stored value
    value: RwLock<Arc<str>>,
    /// Last access timestamp (monotonic nanoseconds)
    last_access: AtomicU64,
    /// Creation timestamp (wall clock), never changes
    created_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: &str) -> Self {
        Self {
            value: RwLock::new(Arc::from(value)),
            last_access: AtomicU64::new(monotonic_nanos()),
            created_at: Utc::now(),
        }
    }

    // == Read ==
    /// Returns the value and refreshes the last access time.
    pub fn read(&self) -> Arc<str> {
        self.touch();
        self.value.read().clone()
    }

    // == Write ==
    /// Replaces the value, then refreshes the last access time.
    pub fn write(&self, value: &str) {
        *self.value.write() = Arc::from(value);
        self.touch();
    }

    /// Marks the entry as accessed now.
    pub fn touch(&self) {
        self.last_access.store(monotonic_nanos(), Ordering::Relaxed);
    }

    /// Last access time in monotonic nanoseconds.
    pub fn last_access(&self) -> u64 {
        self.last_access.load(Ordering::Relaxed)
    }

    /// Wall-clock time the entry was first inserted.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

// == Utility Functions ==
/// Returns nanoseconds elapsed since the first call in this process.
pub fn monotonic_nanos() -> u64 {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    u64::try_from(epoch.elapsed().as_nanos()).unwrap_or(u64::MAX)
}
