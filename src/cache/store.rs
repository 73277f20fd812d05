//! Tag Store Module
//!
//! Synchronous cache engine: primary key -> entry map, reverse tag -> keys
//! index, per-tag generations, LRU capacity bound and TTL expiry.
//! Concurrency is layered on top by `ReadThroughCache`.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

use bytes::Bytes;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_PAYLOAD_SIZE};
use crate::error::{AppError, Result};

// == Insert Outcome ==
/// What happened to a payload offered to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Stored,
    /// A tag was invalidated after the generations were observed
    Stale,
    /// Payload exceeds `MAX_PAYLOAD_SIZE`
    TooLarge,
}

// == Tag Store ==
#[derive(Debug)]
pub struct TagStore {
    entries: HashMap<String, CacheEntry>,
    /// Reverse index, every key listed here is present in `entries`
    tag_index: HashMap<String, HashSet<String>>,
    /// Bumped on every invalidation of the tag; never reset. One counter
    /// per distinct tag ever invalidated, so tags must come from a small
    /// fixed set such as `authorCache`, never from request data.
    generations: HashMap<String, u64>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
    ttl: Option<Duration>,
}

impl TagStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` entries, each living
    /// for `ttl` (None = until invalidated or evicted).
    pub fn new(max_entries: usize, ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            tag_index: HashMap::new(),
            generations: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            ttl,
        }
    }

    // == Validate ==
    /// Rejects empty or oversized keys and empty tag sets.
    pub fn validate(key: &str, tags: &[&str]) -> Result<()> {
        if key.is_empty() {
            return Err(AppError::Cache("cache key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(AppError::Cache(format!(
                "cache key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if tags.is_empty() || tags.iter().any(|tag| tag.is_empty()) {
            return Err(AppError::Cache(format!(
                "cache key '{}' needs at least one non-empty tag",
                key
            )));
        }
        Ok(())
    }

    // == Get ==
    /// Returns the payload for `key` if present and not expired, recording
    /// a hit or a miss. Expired entries are dropped on the way.
    pub fn get(&mut self, key: &str) -> Option<Bytes> {
        let found = self.probe(key);
        match found {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        found
    }

    // == Probe ==
    /// Like `get` but leaves hit/miss counters untouched.
    pub fn probe(&mut self, key: &str) -> Option<Bytes> {
        let expired = self.entries.get(key)?.is_expired();
        if expired {
            self.remove(key);
            return None;
        }

        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.payload.clone())
    }

    // == Generations ==
    /// Current generation of each tag, in the order given.
    pub fn generations(&self, tags: &[&str]) -> Vec<u64> {
        tags.iter()
            .map(|tag| self.generations.get(*tag).copied().unwrap_or(0))
            .collect()
    }

    // == Insert ==
    /// Stores `payload` under `key` tagged with `tags`, unless any tag was
    /// invalidated since `observed` was read via `generations`.
    ///
    /// Replacing an existing key re-indexes it under the new tags. A new
    /// key at capacity evicts the least recently used entry.
    pub fn insert(
        &mut self,
        key: &str,
        payload: Bytes,
        tags: &[&str],
        observed: &[u64],
    ) -> Result<InsertOutcome> {
        Self::validate(key, tags)?;

        if payload.len() > MAX_PAYLOAD_SIZE {
            return Ok(InsertOutcome::TooLarge);
        }
        if self.generations(tags) != observed {
            return Ok(InsertOutcome::Stale);
        }

        if self.entries.contains_key(key) {
            self.remove(key);
        } else if self.entries.len() >= self.max_entries {
            if let Some(oldest) = self.lru.evict_oldest() {
                self.remove(&oldest);
                self.stats.record_eviction();
            }
        }

        let entry = CacheEntry::new(payload, tags.iter().copied(), self.ttl);
        for tag in &entry.tags {
            self.tag_index
                .entry(tag.clone())
                .or_default()
                .insert(key.to_string());
        }
        self.entries.insert(key.to_string(), entry);
        self.lru.touch(key);

        Ok(InsertOutcome::Stored)
    }

    // == Invalidate Tags ==
    /// Removes every entry indexed under any of `tags` and bumps their
    /// generations. Returns the number of entries removed.
    pub fn invalidate_tags(&mut self, tags: &[&str]) -> usize {
        let mut doomed: BTreeSet<String> = BTreeSet::new();
        for tag in tags {
            *self.generations.entry((*tag).to_string()).or_insert(0) += 1;
            if let Some(keys) = self.tag_index.remove(*tag) {
                doomed.extend(keys);
            }
        }

        let removed = doomed.iter().filter(|key| self.remove(key)).count();
        self.stats.record_invalidations(removed);
        removed
    }

    // == Remove ==
    /// Drops one entry and its index references. Returns whether it existed.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(entry) = self.entries.remove(key) else {
            return false;
        };

        for tag in &entry.tags {
            if let Some(keys) = self.tag_index.get_mut(tag) {
                keys.remove(key);
                if keys.is_empty() {
                    self.tag_index.remove(tag);
                }
            }
        }
        self.lru.remove(key);
        true
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = super::entry::current_timestamp_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    pub fn record_production(&mut self) {
        self.stats.record_production();
    }

    pub fn record_coalesced(&mut self) {
        self.stats.record_coalesced();
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_sizes(self.entries.len(), self.tag_index.len());
        stats
    }

    /// Keys currently indexed under `tag`.
    pub fn keys_for_tag(&self, tag: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .tag_index
            .get(tag)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
