//! Expiry Sweep Task
//!
//! Background task that periodically reclaims expired cache entries. Lazy
//! expiry on read already hides them; the sweep only frees memory sooner.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns the sweep, or returns `None` when `interval_secs` is 0 or caching
/// is disabled.
///
/// The returned handle should be aborted on shutdown.
///
/// # Example
/// ```ignore
/// let cache = Cache::init(CacheConfig::from_env());
/// let sweep = spawn_cleanup_task(cache.clone(), cache.config().cleanup_interval);
/// // Later, during shutdown:
/// if let Some(handle) = sweep { handle.abort(); }
/// cache.close();
/// ```
pub fn spawn_cleanup_task(cache: Cache, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 || !cache.is_enabled() {
        return None;
    }

    let interval = Duration::from_secs(interval_secs);

    Some(tokio::spawn(async move {
        info!(
            "Starting cache expiry sweep with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired();
            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    }))
}
