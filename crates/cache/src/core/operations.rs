//! Cache read/write operations

use super::types::{CacheInner, CacheStats, TtlCache};
use crate::entry::{CacheEntry, CacheValue};
use flowgate_utils::sync::deadline_after;
use std::future::Future;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::Instant;

impl<V: CacheValue> TtlCache<V> {
    /// Get a live value, refreshing its recency
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.inner.entries.lock();

        let lookup = entries
            .get(key)
            .map(|entry| (!entry.is_expired(now)).then(|| entry.value.clone()));

        match lookup {
            Some(Some(value)) => {
                self.inner.counters.hits.fetch_add(1, Ordering::Relaxed);
                flowgate_utils::tracing::cache_event(key, true);
                return Some(value);
            }
            Some(None) => {
                entries.pop(key);
                self.inner
                    .counters
                    .expired_removals
                    .fetch_add(1, Ordering::Relaxed);
            }
            None => {}
        }
        drop(entries);

        self.inner.counters.misses.fetch_add(1, Ordering::Relaxed);
        flowgate_utils::tracing::cache_event(key, false);
        None
    }

    /// Store a value; `ttl` of `None` uses the configured default
    ///
    /// Returns `false` without storing anything for a zero ttl. Inserting a new
    /// key into a full cache first evicts the least recently used entry.
    pub fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> bool {
        let ttl = ttl.unwrap_or(self.inner.config.default_ttl);
        if ttl.is_zero() {
            tracing::warn!(key = %key, "refusing to cache entry with zero ttl");
            return false;
        }

        let now = Instant::now();
        let mut entries = self.inner.entries.lock();

        let created_at = entries
            .peek(key)
            .filter(|existing| !existing.is_expired(now))
            .map_or(now, |existing| existing.created_at);

        if !entries.contains(key) && entries.len() >= self.inner.config.capacity {
            if let Some((evicted, _)) = entries.pop_lru() {
                self.inner.counters.evictions.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %evicted, "cache evicted (LRU)");
            }
        }

        let expires_at = deadline_after(now, ttl);
        entries.push(key.to_string(), CacheEntry::new(value, created_at, expires_at));
        tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "cache set");
        true
    }

    /// Remove a key; returns whether a live entry was present
    ///
    /// An expired entry is still removed but reported as absent.
    pub fn delete(&self, key: &str) -> bool {
        let now = Instant::now();
        let popped = self.inner.entries.lock().pop(key);

        match popped {
            Some(entry) if entry.is_expired(now) => {
                self.inner
                    .counters
                    .expired_removals
                    .fetch_add(1, Ordering::Relaxed);
                false
            }
            Some(_) => {
                tracing::debug!(key = %key, "cache removed");
                true
            }
            None => false,
        }
    }

    /// Whether a live entry exists; does not refresh recency
    pub fn exists(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entries = self.inner.entries.lock();

        match entries.peek(key).map(|entry| entry.is_expired(now)) {
            Some(false) => true,
            Some(true) => {
                entries.pop(key);
                self.inner
                    .counters
                    .expired_removals
                    .fetch_add(1, Ordering::Relaxed);
                false
            }
            None => false,
        }
    }

    /// Remaining time-to-live of a live entry
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.inner
            .entries
            .lock()
            .peek(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.expires_at.saturating_duration_since(now))
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.inner.entries.lock().clear();
        tracing::info!("cache cleared");
    }

    /// Number of physically stored entries, including expired ones
    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached value or compute, store and return it
    pub fn get_or_insert_with<F>(&self, key: &str, ttl: Option<Duration>, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = compute();
        self.set(key, value.clone(), ttl);
        value
    }

    /// Return the cached value or await `fetch`; only successes are cached
    ///
    /// The lock is not held while fetching, so concurrent misses for the same
    /// key may each run `fetch`.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = fetch().await?;
        self.set(key, value.clone(), ttl);
        Ok(value)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.inner.entries.lock();
        let capacity = self.inner.config.capacity;

        let count = entries.len();
        let expired_count = entries.iter().filter(|(_, e)| e.is_expired(now)).count();
        let approx_bytes = entries.iter().map(|(_, e)| e.approx_bytes).sum();
        drop(entries);

        let counters = &self.inner.counters;
        CacheStats {
            count,
            active_count: count - expired_count,
            expired_count,
            capacity,
            usage_percent: count as f64 / capacity as f64 * 100.0,
            approx_bytes,
            default_ttl_secs: self.inner.config.default_ttl.as_secs(),
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            evictions: counters.evictions.load(Ordering::Relaxed),
            expired_removals: counters.expired_removals.load(Ordering::Relaxed),
        }
    }

    /// Physically remove all expired entries; returns how many were removed
    pub fn purge_expired(&self) -> usize {
        Self::purge_expired_inner(&self.inner)
    }

    pub(super) fn purge_expired_inner(inner: &CacheInner<V>) -> usize {
        let now = Instant::now();
        let mut entries = inner.entries.lock();

        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            entries.pop(key.as_str());
        }
        drop(entries);

        if !expired.is_empty() {
            inner
                .counters
                .expired_removals
                .fetch_add(expired.len() as u64, Ordering::Relaxed);
            tracing::info!(removed = expired.len(), "cleaned up expired cache entries");
        }
        expired.len()
    }
}
