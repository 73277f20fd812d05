//! Read-Through Cache Module
//!
//! Concurrent front of the `TagStore` with per-key single flight.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::cache::{CacheStats, InsertOutcome, Producer, TagAwareCache, TagStore};
use crate::config::Config;
use crate::error::Result;

type FlightMap = HashMap<String, Arc<Mutex<()>>>;

// == Read-Through Cache ==
/// Tag-invalidated read-through cache.
///
/// Lookups, inserts and invalidations go through one `RwLock<TagStore>`
/// which is never held while a producer runs. Productions are serialized
/// per key by an async mutex looked up in `flights`, so a stampede on one
/// key runs the producer once while other keys proceed independently.
#[derive(Debug)]
pub struct ReadThroughCache {
    store: RwLock<TagStore>,
    flights: StdMutex<FlightMap>,
}

impl ReadThroughCache {
    pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
        Self {
            store: RwLock::new(TagStore::new(max_entries, ttl)),
            flights: StdMutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_entries, config.cache_ttl())
    }

    /// Whether `key` currently holds an entry (expired or not).
    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains(key)
    }

    /// Keys currently indexed under `tag`, sorted.
    pub async fn keys_for_tag(&self, tag: &str) -> Vec<String> {
        self.store.read().await.keys_for_tag(tag)
    }

    /// Number of keys with a production slot, in flight or queued.
    pub fn flights_in_progress(&self) -> usize {
        lock_flights(&self.flights).len()
    }

    fn join_flight(&self, key: &str) -> Flight<'_> {
        let lock = lock_flights(&self.flights)
            .entry(key.to_string())
            .or_default()
            .clone();

        Flight {
            flights: &self.flights,
            key: key.to_string(),
            lock,
        }
    }
}

#[async_trait]
impl TagAwareCache for ReadThroughCache {
    async fn get(&self, key: &str, tags: &[&str], producer: Producer<'_>) -> Result<Bytes> {
        TagStore::validate(key, tags)?;

        if let Some(payload) = self.store.write().await.get(key) {
            debug!(key, "cache hit");
            return Ok(payload);
        }

        let flight = self.join_flight(key);
        let _turn = flight.lock.lock().await;

        // Whoever held the slot before us may have stored the entry already
        let observed = {
            let mut store = self.store.write().await;
            if let Some(payload) = store.probe(key) {
                store.record_coalesced();
                debug!(key, "served by concurrent production");
                return Ok(payload);
            }
            store.record_production();
            store.generations(tags)
        };

        debug!(key, "cache miss, running producer");
        let payload = producer.await?;

        let outcome = self
            .store
            .write()
            .await
            .insert(key, payload.clone(), tags, &observed)?;
        match outcome {
            InsertOutcome::Stored => debug!(key, bytes = payload.len(), "cached"),
            InsertOutcome::Stale => {
                debug!(key, "tag invalidated while producing, result not cached")
            }
            InsertOutcome::TooLarge => {
                warn!(key, bytes = payload.len(), "payload too large to cache")
            }
        }

        Ok(payload)
    }

    async fn invalidate_tags(&self, tags: &[&str]) -> usize {
        let removed = self.store.write().await.invalidate_tags(tags);
        debug!(?tags, removed, "invalidated tags");
        removed
    }

    async fn remove(&self, key: &str) -> bool {
        self.store.write().await.remove(key)
    }

    async fn purge_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}

// == Flight ==
/// Membership in the production queue of one key.
///
/// Dropping it, on completion or cancellation, releases its handle under
/// the map lock and removes the map entry once no handle is left.
struct Flight<'a> {
    flights: &'a StdMutex<FlightMap>,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        let mut flights = lock_flights(self.flights);
        // Clones are only taken or released under the map lock
        drop(std::mem::take(&mut self.lock));
        let idle = flights
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            flights.remove(&self.key);
        }
    }
}

fn lock_flights(flights: &StdMutex<FlightMap>) -> MutexGuard<'_, FlightMap> {
    flights.lock().unwrap_or_else(PoisonError::into_inner)
}
