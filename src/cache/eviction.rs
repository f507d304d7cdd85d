//! Eviction Module
//!
//! Approximate global LRU eviction across all shards.
//!
//! A pass snapshots `(key, last_access, shard)` candidates into a bounded
//! heap, then removes the oldest `batch_size` of them shard by shard. The
//! snapshot may already be stale when removal runs, so the result is only an
//! approximation of the true global LRU order.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::cache::{CacheStore, MemorySampler};
use crate::config::Config;
use crate::error::Result;

// == Candidate ==
/// A key considered for removal during a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Last access time when the candidate was collected
    pub last_access: u64,
    /// Shard the key lives in
    pub shard: usize,
    /// The key
    pub key: String,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.last_access
            .cmp(&other.last_access)
            .then_with(|| self.shard.cmp(&other.shard))
            .then_with(|| self.key.cmp(&other.key))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// == Candidate Heap ==
/// Keeps the `capacity` least recently accessed candidates offered to it.
///
/// Backed by a max-heap so the most recently accessed candidate sits on top
/// and is the one dropped on overflow.
#[derive(Debug)]
pub struct CandidateHeap {
    heap: BinaryHeap<Candidate>,
    capacity: usize,
}

impl CandidateHeap {
    /// Creates an empty heap retaining at most `capacity` candidates.
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Offers a candidate, discarding the most recent one on overflow.
    pub fn offer(&mut self, candidate: Candidate) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() == self.capacity {
            match self.heap.peek() {
                Some(newest) if candidate.last_access >= newest.last_access => return,
                _ => {}
            }
        }
        self.heap.push(candidate);
        if self.heap.len() > self.capacity {
            self.heap.pop();
        }
    }

    /// Number of retained candidates.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if no candidate is retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Consumes the heap, returning up to `limit` candidates oldest first.
    pub fn into_oldest(self, limit: usize) -> Vec<Candidate> {
        let mut sorted = self.heap.into_sorted_vec();
        sorted.truncate(limit);
        sorted
    }
}

// == Eviction Coordinator ==
/// Decides when to evict and runs eviction passes against a store.
pub struct EvictionCoordinator {
    store: Arc<CacheStore>,
    sampler: Box<dyn MemorySampler>,
    max_entries: usize,
    memory_threshold: f64,
    batch_size: usize,
}

impl std::fmt::Debug for EvictionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvictionCoordinator")
            .field("max_entries", &self.max_entries)
            .field("memory_threshold", &self.memory_threshold)
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl EvictionCoordinator {
    // == Constructor ==
    /// Creates a coordinator for `store`.
    pub fn new(
        store: Arc<CacheStore>,
        sampler: impl MemorySampler,
        max_entries: usize,
        memory_threshold: f64,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            sampler: Box::new(sampler),
            max_entries,
            memory_threshold,
            batch_size,
        }
    }

    /// Creates a coordinator using the thresholds from configuration.
    pub fn from_config(
        store: Arc<CacheStore>,
        sampler: impl MemorySampler,
        config: &Config,
    ) -> Self {
        Self::new(
            store,
            sampler,
            config.max_entries,
            config.memory_threshold,
            config.eviction_batch_size,
        )
    }

    /// The store this coordinator evicts from.
    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    fn memory_ratio(&self) -> f64 {
        self.sampler.usage_ratio().unwrap_or(0.0)
    }

    // == Check ==
    /// Runs a pass when memory usage or entry count is over its threshold.
    ///
    /// Returns the number of removed entries, or None if no pass was needed.
    pub fn check(&self) -> Option<usize> {
        let ratio = self.memory_ratio();
        let size = self.store.len();

        if ratio > self.memory_threshold || size > self.max_entries {
            debug!(
                "Eviction triggered: memory ratio {:.3} (threshold {}), size {} (max {})",
                ratio, self.memory_threshold, size, self.max_entries
            );
            Some(self.evict_lru())
        } else {
            None
        }
    }

    // == Evict ==
    /// Runs one eviction pass and returns the number of removed entries.
    ///
    /// Failures are logged and swallowed; whatever was removed before the
    /// failure stays removed.
    pub fn evict_lru(&self) -> usize {
        let mut removed = 0;
        let outcome = {
            let _sweep = self.store.begin_sweep();
            self.sweep(&mut removed)
        };

        if let Err(err) = outcome {
            error!("Error during cache eviction: {}", err);
        }

        self.store.stats_registry().record_eviction_pass(removed);
        info!(
            "Cache eviction: removed {} entries, current size: {}, memory usage: {:.1}%",
            removed,
            self.store.len(),
            self.memory_ratio() * 100.0
        );
        removed
    }

    fn sweep(&self, removed: &mut usize) -> Result<()> {
        let mut candidates = CandidateHeap::new(self.batch_size.saturating_mul(2));

        for shard in 0..self.store.shard_count() {
            self.store.scan_shard(shard, |key, last_access| {
                candidates.offer(Candidate {
                    last_access,
                    shard,
                    key: key.to_owned(),
                });
            })?;
        }

        for candidate in candidates.into_oldest(self.batch_size) {
            if self.store.remove_from_shard(candidate.shard, &candidate.key)? {
                *removed += 1;
            }
        }
        Ok(())
    }
}
