//! Cache Module
//!
//! Tag-invalidated read-through caching for serialized list pages.

mod entry;
mod key;
mod lru;
mod null;
mod read_through;
mod stats;
mod store;


use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;

use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use key::ListKey;
pub use lru::LruTracker;
pub use null::NullCache;
pub use read_through::ReadThroughCache;
pub use stats::CacheStats;
pub use store::{InsertOutcome, TagStore};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Largest payload that will be stored; bigger results are served uncached
pub const MAX_PAYLOAD_SIZE: usize = 8 * 1024 * 1024; // 8 MB

/// Computation run on a cache miss.
pub type Producer<'a> = BoxFuture<'a, Result<Bytes>>;

// == Tag Aware Cache ==
/// Cache contract used by the service layer.
#[async_trait]
pub trait TagAwareCache: Send + Sync {
    /// Returns the payload stored under `key`, or runs `producer` once,
    /// stores its result tagged with `tags`, and returns it.
    ///
    /// Concurrent callers for the same missing key share one production.
    /// A producer error is returned unchanged and nothing is stored.
    async fn get(&self, key: &str, tags: &[&str], producer: Producer<'_>) -> Result<Bytes>;

    /// Drops every entry tagged with any of `tags`. Returns the number removed.
    async fn invalidate_tags(&self, tags: &[&str]) -> usize;

    /// Drops a single entry.
    async fn remove(&self, key: &str) -> bool;

    /// Drops expired entries. Returns the number removed.
    async fn purge_expired(&self) -> usize;

    async fn stats(&self) -> CacheStats;
}
