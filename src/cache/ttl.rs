//! Per-method TTL response cache.

use bytes::Bytes;
use dashmap::DashMap;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::observability::metrics;

/// A cached response and when it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Bytes,
    pub timestamp: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now <= self.timestamp + ttl
    }
}

/// Method name -> latest successful response.
///
/// Only methods with a configured TTL are ever stored. Expired entries are
/// dropped when they are next read; nothing sweeps in the background.
#[derive(Debug, Default)]
pub struct TtlCache {
    ttls: HashMap<String, Duration>,
    entries: DashMap<String, CacheEntry>,
}

impl TtlCache {
    /// Create an empty cache for the given method lifetimes.
    pub fn new(ttls: HashMap<String, Duration>) -> Self {
        Self {
            ttls,
            entries: DashMap::new(),
        }
    }

    /// Whether `method` has a configured TTL.
    pub fn is_cacheable(&self, method: &str) -> bool {
        self.ttls.contains_key(method)
    }

    /// Configured TTL for `method`.
    pub fn ttl(&self, method: &str) -> Option<Duration> {
        self.ttls.get(method).copied()
    }

    /// Return the stored value if it is still fresh.
    pub fn get(&self, method: &str) -> Option<Bytes> {
        let ttl = self.ttl(method)?;
        let now = Instant::now();

        if let Some(entry) = self.entries.get(method) {
            if entry.is_fresh(ttl, now) {
                return Some(entry.value.clone());
            }
        }

        if self
            .entries
            .remove_if(method, |_, entry| !entry.is_fresh(ttl, now))
            .is_some()
        {
            tracing::trace!(method, "Evicted expired cache entry");
            metrics::record_cache_size(self.entries.len());
        }
        None
    }

    /// Store `value` for `method`, replacing any previous entry.
    ///
    /// Returns false (and stores nothing) when the method is not cacheable or
    /// the value is empty.
    pub fn add(&self, method: &str, value: Bytes) -> bool {
        if !self.is_cacheable(method) || value.is_empty() {
            return false;
        }

        self.entries.insert(
            method.to_string(),
            CacheEntry {
                value,
                timestamp: Instant::now(),
            },
        );
        metrics::record_cache_size(self.entries.len());
        true
    }

    /// Number of stored entries, fresh or not yet evicted.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TtlCache {
        let mut ttls = HashMap::new();
        ttls.insert("getVersion".to_string(), Duration::from_millis(120_000));
        ttls.insert("getLatestBlockhash".to_string(), Duration::from_millis(5_000));
        TtlCache::new(ttls)
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_is_returned() {
        let cache = cache();
        assert!(cache.get("getVersion").is_none());

        assert!(cache.add("getVersion", Bytes::from_static(b"X")));
        tokio::time::advance(Duration::from_millis(1_000)).await;

        assert_eq!(cache.get("getVersion"), Some(Bytes::from_static(b"X")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_valid_until_exactly_ttl() {
        let cache = cache();
        cache.add("getLatestBlockhash", Bytes::from_static(b"hash"));

        tokio::time::advance(Duration::from_millis(5_000)).await;
        assert!(cache.get("getLatestBlockhash").is_some());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(cache.get("getLatestBlockhash").is_none());
        // Lazily invalidated on that read
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttls_are_per_method() {
        let cache = cache();
        cache.add("getVersion", Bytes::from_static(b"v"));
        cache.add("getLatestBlockhash", Bytes::from_static(b"h"));

        tokio::time::advance(Duration::from_millis(10_000)).await;

        assert!(cache.get("getVersion").is_some());
        assert!(cache.get("getLatestBlockhash").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_overwrites_and_refreshes() {
        let cache = cache();
        cache.add("getLatestBlockhash", Bytes::from_static(b"old"));
        tokio::time::advance(Duration::from_millis(4_000)).await;

        cache.add("getLatestBlockhash", Bytes::from_static(b"new"));
        tokio::time::advance(Duration::from_millis(4_000)).await;

        assert_eq!(
            cache.get("getLatestBlockhash"),
            Some(Bytes::from_static(b"new"))
        );
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_rejects_uncacheable_and_empty() {
        let cache = cache();
        assert!(!cache.add("getBalance", Bytes::from_static(b"1")));
        assert!(!cache.add("getVersion", Bytes::new()));
        assert!(cache.is_empty());
        assert!(cache.get("getBalance").is_none());
    }

    #[test]
    fn test_cacheability() {
        let cache = cache();
        assert!(cache.is_cacheable("getVersion"));
        assert!(!cache.is_cacheable("sendTransaction"));
        assert_eq!(cache.ttl("getVersion"), Some(Duration::from_secs(120)));
    }
}
