//! Cache Module
//!
//! Sharded in-memory storage with memory-pressure driven approximate LRU
//! eviction.

mod entry;
mod eviction;
mod memory;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use eviction::{Candidate, CandidateHeap, EvictionCoordinator};
pub use memory::{FixedMemorySampler, MemorySampler, ProcMemorySampler};
pub use stats::{CacheStats, StatsRegistry};
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in characters
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value length in characters
pub const MAX_VALUE_LENGTH: usize = 256;
