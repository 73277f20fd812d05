//! Always-miss cache used when caching is disabled.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use crate::cache::{CacheStats, Producer, TagAwareCache, TagStore};
use crate::error::Result;

/// Runs every producer and stores nothing. Invalidation is a no-op.
#[derive(Debug, Default)]
pub struct NullCache {
    stats: Mutex<CacheStats>,
}

impl NullCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TagAwareCache for NullCache {
    async fn get(&self, key: &str, tags: &[&str], producer: Producer<'_>) -> Result<Bytes> {
        TagStore::validate(key, tags)?;
        {
            let mut stats = self.stats.lock().await;
            stats.record_miss();
            stats.record_production();
        }
        producer.await
    }

    async fn invalidate_tags(&self, _tags: &[&str]) -> usize {
        0
    }

    async fn remove(&self, _key: &str) -> bool {
        false
    }

    async fn purge_expired(&self) -> usize {
        0
    }

    async fn stats(&self) -> CacheStats {
        self.stats.lock().await.clone()
    }
}
