//! Cache Store Module
//!
//! Sharded cache engine: a fixed array of independently locked maps plus a
//! store-wide coordination lock that eviction takes exclusively.
//!
//! Lock order for every operation is coordination lock first, shard lock
//! second. Normal gets and puts take both in shared mode; an eviction pass
//! holds the coordination lock exclusively, so it waits for in-flight calls
//! to finish and stalls new ones until it is done.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{RwLock, RwLockWriteGuard};

use crate::cache::{CacheEntry, CacheStats, StatsRegistry, MAX_KEY_LENGTH, MAX_VALUE_LENGTH};
use crate::config::Config;
use crate::error::{CacheError, Result};

/// Internal lock stripes per shard map. The outer arena already spreads
/// keys, so each map only needs a few.
const MAP_STRIPES: usize = 4;

// == Shard ==
/// One partition of the key space.
///
/// The map accepts concurrent inserts and updates on its own; the lock only
/// separates normal traffic (shared) from removals (exclusive).
#[derive(Debug)]
struct Shard {
    lock: RwLock<()>,
    map: DashMap<String, CacheEntry>,
}

impl Shard {
    fn new() -> Self {
        Self {
            lock: RwLock::new(()),
            map: DashMap::with_shard_amount(MAP_STRIPES),
        }
    }
}

// == Cache Store ==
/// Thread-safe sharded key-value storage.
#[derive(Debug)]
pub struct CacheStore {
    /// Shard arena, length is always a power of two
    shards: Box<[Shard]>,
    /// `shards.len() - 1`
    shard_mask: usize,
    /// Hasher fixed for the store lifetime so shard assignment is stable
    hash_builder: RandomState,
    /// Store-wide lock gating eviction passes
    coordination: RwLock<()>,
    /// Approximate entry count, used for threshold checks only
    size: AtomicUsize,
    /// Call counters
    stats: StatsRegistry,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store with `shard_count` shards.
    ///
    /// The count is rounded up to the next power of two (minimum 1) so the
    /// shard index can be taken with a bit mask.
    pub fn new(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1).next_power_of_two();
        let shards: Vec<Shard> = (0..shard_count).map(|_| Shard::new()).collect();

        Self {
            shards: shards.into_boxed_slice(),
            shard_mask: shard_count - 1,
            hash_builder: RandomState::new(),
            coordination: RwLock::new(()),
            size: AtomicUsize::new(0),
            stats: StatsRegistry::new(),
        }
    }

    /// Creates a store sized from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.shard_count)
    }

    // == Put ==
    /// Inserts a new entry or overwrites the value of an existing one.
    ///
    /// Both key and value must be at most 256 characters; empty strings are
    /// accepted.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        self.stats.record_put();

        if exceeds_limit(key, MAX_KEY_LENGTH) || exceeds_limit(value, MAX_VALUE_LENGTH) {
            return Err(CacheError::validation(
                "Key and value must be <= 256 characters.",
            ));
        }

        let _coordination = self.coordination.read();
        let shard = &self.shards[self.shard_index(key)];
        let _shard_guard = shard.lock.read();

        if let Some(existing) = shard.map.get(key) {
            existing.write(value);
            return Ok(());
        }

        match shard.map.entry(key.to_owned()) {
            Entry::Occupied(existing) => existing.get().write(value),
            Entry::Vacant(slot) => {
                slot.insert(CacheEntry::new(value));
                self.size.fetch_add(1, Ordering::Relaxed);
            }
        }

        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key and refreshes its access time.
    pub fn get(&self, key: &str) -> Result<String> {
        self.stats.record_get();

        if exceeds_limit(key, MAX_KEY_LENGTH) {
            return Err(CacheError::validation("Key must be <= 256 characters."));
        }

        let _coordination = self.coordination.read();
        let shard = &self.shards[self.shard_index(key)];
        let _shard_guard = shard.lock.read();

        match shard.map.get(key) {
            Some(entry) => Ok(entry.read().to_string()),
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound)
            }
        }
    }

    // == Eviction Support ==
    /// Takes the coordination lock exclusively for the length of a sweep.
    pub(crate) fn begin_sweep(&self) -> RwLockWriteGuard<'_, ()> {
        self.coordination.write()
    }

    /// Visits `(key, last_access)` for every entry of one shard under its
    /// shared lock.
    pub(crate) fn scan_shard<F>(&self, index: usize, mut visit: F) -> Result<()>
    where
        F: FnMut(&str, u64),
    {
        let shard = self.shard_at(index)?;
        let _shard_guard = shard.lock.read();

        for item in shard.map.iter() {
            visit(item.key().as_str(), item.value().last_access());
        }
        Ok(())
    }

    /// Removes `key` from shard `index` under the shard's exclusive lock.
    ///
    /// Returns `false` when the key was already gone.
    pub(crate) fn remove_from_shard(&self, index: usize, key: &str) -> Result<bool> {
        let shard = self.shard_at(index)?;
        let _shard_guard = shard.lock.write();

        if shard.map.remove(key).is_some() {
            self.size.fetch_sub(1, Ordering::Relaxed);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn stats_registry(&self) -> &StatsRegistry {
        &self.stats
    }

    fn shard_at(&self, index: usize) -> Result<&Shard> {
        self.shards.get(index).ok_or_else(|| {
            CacheError::Eviction(format!(
                "shard index {} out of range for {} shards",
                index,
                self.shards.len()
            ))
        })
    }

    /// Index of the shard owning `key`.
    pub fn shard_index(&self, key: &str) -> usize {
        // Truncation is fine, only the low bits are kept.
        (self.hash_builder.hash_one(key) as usize) & self.shard_mask
    }

    // == Stats ==
    /// Returns current counter readings.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }

    // == Length ==
    /// Returns the approximate number of entries in the store.
    pub fn len(&self) -> usize {
        self.size.load(Ordering::Relaxed)
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

fn exceeds_limit(text: &str, limit: usize) -> bool {
    // Byte length bounds the char count from above.
    text.len() > limit && text.chars().count() > limit
}
