//! Cache Statistics Module
//!
//! Lock-free counters for gets, puts, misses and evictions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Registry ==
/// Monotonic counters shared by every caller thread.
///
/// Each counter is bumped with a single relaxed fetch-and-add. Readings carry
/// no consistency guarantee relative to the store content or to each other.
#[derive(Debug, Default)]
pub struct StatsRegistry {
    gets: AtomicU64,
    puts: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    eviction_passes: AtomicU64,
}

impl StatsRegistry {
    // == Constructor ==
    /// Creates a new registry with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a get call.
    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a put call.
    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a get that found nothing.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a finished eviction pass and the entries it removed.
    pub fn record_eviction_pass(&self, removed: usize) {
        self.eviction_passes.fetch_add(1, Ordering::Relaxed);
        self.evictions.fetch_add(removed as u64, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Reads every counter into a serializable snapshot.
    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        CacheStats {
            gets: self.gets.load(Ordering::Relaxed),
            puts: self.puts.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            eviction_passes: self.eviction_passes.load(Ordering::Relaxed),
            total_entries,
        }
    }
}

// == Cache Stats ==
/// Point-in-time reading of the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Total get calls, including rejected ones
    pub gets: u64,
    /// Total put calls, including rejected ones
    pub puts: u64,
    /// Gets on absent keys
    pub misses: u64,
    /// Entries removed by eviction passes
    pub evictions: u64,
    /// Completed eviction passes
    pub eviction_passes: u64,
    /// Approximate number of entries in the store
    pub total_entries: usize,
}
