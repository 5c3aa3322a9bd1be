//! Background Sweep Task
//!
//! The janitor: on a fixed interval, removes expired entries from both
//! tiers and re-applies the memory tier capacity rule.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheEngine;

/// Spawns the background sweep task.
///
/// The task runs in an infinite loop, sleeping for the configured interval
/// between passes. Each pass takes the same memory tier lock as foreground
/// operations, so eviction never iterates over a map being mutated.
///
/// # Arguments
/// * `engine` - Shared engine handle
/// * `sweep_interval_secs` - Interval in seconds between passes
///
/// # Returns
/// A JoinHandle for the spawned task, used to abort it during graceful
/// shutdown.
pub fn spawn_sweep_task(engine: Arc<CacheEngine>, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let report = engine.sweep().await;

            if report.memory_expired > 0 || report.memory_evicted > 0 || report.durable_expired > 0
            {
                info!(
                    memory_expired = report.memory_expired,
                    memory_evicted = report.memory_evicted,
                    durable_expired = report.durable_expired,
                    "sweep pass removed entries"
                );
            } else {
                debug!("sweep pass found nothing to remove");
            }
        }
    })
}
