//! TTL Cleanup Task
//!
//! Background task that periodically purges expired cache entries so that
//! stale list pages do not keep memory or tag index slots alive.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TagAwareCache;

/// Spawns a background task that purges expired entries every
/// `cleanup_interval_secs` seconds.
///
/// The returned handle is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache: Arc<dyn TagAwareCache> = Arc::new(ReadThroughCache::new(1000, None));
/// let cleanup_handle = spawn_cleanup_task(cache.clone(), 1);
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task(
    cache: Arc<dyn TagAwareCache>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ReadThroughCache;
    use bytes::Bytes;

    async fn fill(cache: &ReadThroughCache, key: &str) {
        cache
            .get(
                key,
                &["authorCache"],
                Box::pin(async { Ok(Bytes::from_static(b"[]")) }),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = Arc::new(ReadThroughCache::new(100, Some(Duration::from_millis(200))));
        fill(&cache, "list:author:1:15").await;

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(!cache.contains("list:author:1:15").await);
        assert!(cache.keys_for_tag("authorCache").await.is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = Arc::new(ReadThroughCache::new(100, Some(Duration::from_secs(3600))));
        fill(&cache, "list:author:1:15").await;

        let handle = spawn_cleanup_task(cache.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(cache.contains("list:author:1:15").await);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache: Arc<dyn TagAwareCache> = Arc::new(ReadThroughCache::new(100, None));

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
