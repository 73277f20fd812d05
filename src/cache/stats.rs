//! Cache Statistics Module
//!
//! Tracks hits, misses, evictions and tag invalidation activity.

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Lookups served from the store
    pub hits: u64,
    /// Lookups that found nothing (absent or expired)
    pub misses: u64,
    /// Entries dropped by the capacity bound
    pub evictions: u64,
    /// Entries dropped by tag invalidation
    pub invalidations: u64,
    /// Callers that waited on another caller's production and got its result
    pub coalesced: u64,
    /// Producer invocations
    pub productions: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Current number of tags with at least one entry
    pub total_tags: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }

    pub fn record_coalesced(&mut self) {
        self.coalesced += 1;
    }

    pub fn record_production(&mut self) {
        self.productions += 1;
    }

    pub fn set_sizes(&mut self, entries: usize, tags: usize) {
        self.total_entries = entries;
        self.total_tags = tags;
    }
}
