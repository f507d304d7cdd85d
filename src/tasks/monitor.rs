//! Memory Monitor Task
//!
//! Background task that periodically checks memory usage and entry count and
//! runs an eviction pass when either is over its threshold.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::cache::EvictionCoordinator;

/// Spawns the memory monitor.
///
/// Each tick runs the check on the blocking pool, since a pass blocks on
/// store locks, and waits for it before scheduling the next tick. Passes
/// therefore never overlap; a slow pass delays later ticks instead of
/// queueing them up.
///
/// # Arguments
/// * `coordinator` - Coordinator bound to the store to watch
/// * `interval` - Time between checks
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let coordinator = Arc::new(EvictionCoordinator::from_config(store, sampler, &config));
/// let monitor = spawn_memory_monitor(coordinator, config.memory_check_interval());
/// // Later, during shutdown:
/// monitor.abort();
/// ```
pub fn spawn_memory_monitor(
    coordinator: Arc<EvictionCoordinator>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting memory monitor with interval of {} ms",
            interval.as_millis()
        );

        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let coordinator = coordinator.clone();
            match tokio::task::spawn_blocking(move || coordinator.check()).await {
                Ok(Some(removed)) => debug!("Memory monitor: pass removed {} entries", removed),
                Ok(None) => debug!("Memory monitor: thresholds not exceeded"),
                Err(err) => error!("Memory monitor: eviction check failed: {}", err),
            }
        }
    })
}
