//! Cache Entry Module
//!
//! Defines a cached payload together with the tags it is indexed under.

use std::collections::BTreeSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;

// == Cache Entry ==
/// A stored payload with its tag set and expiry metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized payload, immutable once stored
    pub payload: Bytes,
    /// Tags this entry is indexed under
    pub tags: BTreeSet<String>,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry expiring after `ttl`, or never when `ttl` is None.
    pub fn new<I, S>(payload: Bytes, tags: I, ttl: Option<Duration>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = current_timestamp_ms();
        let expires_at = ttl.map(|ttl| {
            let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
            now.saturating_add(ttl_ms)
        });

        Self {
            payload,
            tags: tags.into_iter().map(Into::into).collect(),
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Expiry check against an explicit clock reading.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        matches!(self.expires_at, Some(expires) if now_ms >= expires)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn payload() -> Bytes {
        Bytes::from_static(b"[]")
    }

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = CacheEntry::new(payload(), ["authorCache"], None);

        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_tags() {
        let entry = CacheEntry::new(payload(), ["authorCache", "lists"], None);

        assert!(entry.tags.contains("authorCache"));
        assert!(entry.tags.contains("lists"));
        assert!(!entry.tags.contains("bookCache"));
        assert_eq!(entry.tags.len(), 2);
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(payload(), ["t"], Some(Duration::from_millis(30)));
        assert!(!entry.is_expired());

        sleep(Duration::from_millis(60));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let entry = CacheEntry::new(payload(), ["t"], Some(Duration::from_secs(u64::MAX)));

        assert_eq!(entry.expires_at, Some(u64::MAX));
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            payload: payload(),
            tags: BTreeSet::new(),
            expires_at: Some(now),
        };

        assert!(entry.is_expired_at(now), "Entry should be expired at boundary");
        assert!(!entry.is_expired_at(now - 1));
    }
}
