//! Expired Entry Purge Task
//!
//! Background task that periodically removes expired memory cache entries.
//! Reads already ignore expired entries; purging only reclaims their memory.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a task that calls [`MemoryCache::purge_expired`] every `interval`.
///
/// Each purge holds the cache's write lock only for the sweep itself. The task
/// runs until its handle is aborted.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(MemoryCache::new(Duration::from_secs(60)));
/// let purge_handle = spawn_purge_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// purge_handle.abort();
/// ```
pub fn spawn_purge_task(cache: Arc<MemoryCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs_f64(),
            "starting expired entry purge task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired();

            if removed > 0 {
                info!("purge: removed {} expired entries", removed);
            } else {
                debug!("purge: no expired entries found");
            }
        }
    })
}
