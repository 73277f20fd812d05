//! LRU Tracker Module
//!
//! Least Recently Used ordering for capacity eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access recency with a monotonic tick per key.
///
/// `ticks` maps key -> last access tick, `order` maps tick -> key, so the
/// smallest tick in `order` is always the least recently used key. Touch,
/// remove and eviction are O(log n).
#[derive(Debug, Default)]
pub struct LruTracker {
    clock: u64,
    ticks: HashMap<String, u64>,
    order: BTreeMap<u64, String>,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, inserting it if new.
    pub fn touch(&mut self, key: &str) {
        self.clock += 1;
        let tick = self.clock;

        match self.ticks.get_mut(key) {
            Some(previous) => {
                self.order.remove(previous);
                *previous = tick;
            }
            None => {
                self.ticks.insert(key.to_string(), tick);
            }
        }
        self.order.insert(tick, key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Returns and forgets the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }
}

#[cfg(test)]
impl LruTracker {
    /// Returns the least recently used key without removing it.
    fn peek_oldest(&self) -> Option<&str> {
        self.order.first_key_value().map(|(_, key)| key.as_str())
    }

    fn len(&self) -> usize {
        self.ticks.len()
    }

    fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    fn contains(&self, key: &str) -> bool {
        self.ticks.contains_key(key)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lru_new() {
        let lru = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.peek_oldest(), None);
    }

    #[test]
    fn test_touch_orders_by_first_access() {
        let mut lru = LruTracker::new();
        lru.touch("list:author:1:15");
        lru.touch("list:author:2:15");
        lru.touch("list:author:3:15");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.peek_oldest(), Some("list:author:1:15"));
    }

    #[test]
    fn test_touch_existing_key_moves_it_to_front() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");
        lru.touch("c");
        lru.touch("a");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.evict_oldest().as_deref(), Some("b"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("c"));
        assert_eq!(lru.evict_oldest().as_deref(), Some("a"));
        assert_eq!(lru.evict_oldest(), None);
    }

    #[test]
    fn test_remove() {
        let mut lru = LruTracker::new();
        lru.touch("a");
        lru.touch("b");
        lru.remove("a");
        lru.remove("missing");

        assert_eq!(lru.len(), 1);
        assert!(!lru.contains("a"));
        assert_eq!(lru.peek_oldest(), Some("b"));
    }

    #[test]
    fn test_repeated_touch_keeps_single_slot() {
        let mut lru = LruTracker::new();
        for _ in 0..5 {
            lru.touch("a");
        }

        assert_eq!(lru.len(), 1);
        assert_eq!(lru.evict_oldest().as_deref(), Some("a"));
        assert!(lru.is_empty());
    }
}
