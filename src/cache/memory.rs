//! Memory Sampling Module
//!
//! Reports how much of the memory budget the process currently uses.

use std::fs;

use tracing::debug;

// == Memory Sampler ==
/// Source of the process memory usage ratio.
pub trait MemorySampler: Send + Sync + 'static {
    /// Used memory divided by the budget, or None when it cannot be sampled.
    fn usage_ratio(&self) -> Option<f64>;
}

// == Proc Sampler ==
/// Reads resident set size from procfs.
///
/// The budget is the configured limit, or total system memory when no limit
/// is configured.
#[derive(Debug, Clone, Default)]
pub struct ProcMemorySampler {
    limit_bytes: Option<u64>,
}

impl ProcMemorySampler {
    /// Creates a sampler measuring against `limit_bytes`.
    pub fn new(limit_bytes: Option<u64>) -> Self {
        Self { limit_bytes }
    }

    fn budget_bytes(&self) -> Option<u64> {
        match self.limit_bytes {
            Some(limit) if limit > 0 => Some(limit),
            _ => read_kib_field("/proc/meminfo", "MemTotal:").map(|kib| kib * 1024),
        }
    }
}

impl MemorySampler for ProcMemorySampler {
    fn usage_ratio(&self) -> Option<f64> {
        let used = read_kib_field("/proc/self/status", "VmRSS:")? * 1024;
        let budget = self.budget_bytes()?;
        Some(used as f64 / budget as f64)
    }
}

fn read_kib_field(path: &str, field: &str) -> Option<u64> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!("Cannot read {}: {}", path, err);
            return None;
        }
    };
    parse_kib_field(&contents, field)
}

/// Extracts the numeric value of a `Field:   1234 kB` line.
fn parse_kib_field(contents: &str, field: &str) -> Option<u64> {
    contents
        .lines()
        .find(|line| line.starts_with(field))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|value| value.parse().ok())
}

// == Fixed Sampler ==
/// Sampler that always reports the same ratio.
#[derive(Debug, Clone, Copy)]
pub struct FixedMemorySampler(pub f64);

impl MemorySampler for FixedMemorySampler {
    fn usage_ratio(&self) -> Option<f64> {
        Some(self.0)
    }
}
