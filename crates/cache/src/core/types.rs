//! Core cache types and structures

use crate::config::CacheConfig;
use crate::entry::{CacheEntry, CacheValue};
use flowgate_core::Result;
use flowgate_utils::PeriodicTask;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

/// Bounded, thread-safe cache with per-entry expiry and LRU eviction
///
/// Cloning is cheap and shares the same storage.
pub struct TtlCache<V> {
    pub(super) inner: Arc<CacheInner<V>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

pub(super) struct CacheInner<V> {
    pub config: CacheConfig,
    /// Entries ordered by last access, most recent first
    pub entries: Mutex<LruCache<String, CacheEntry<V>>>,
    pub counters: Counters,
    /// Background expiry sweep
    pub sweeper: Mutex<Option<PeriodicTask>>,
}

#[derive(Default)]
pub(super) struct Counters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub evictions: AtomicU64,
    pub expired_removals: AtomicU64,
}

/// Point-in-time cache statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Physically stored entries, expired or not
    pub count: usize,
    pub active_count: usize,
    pub expired_count: usize,
    pub capacity: usize,
    pub usage_percent: f64,
    pub approx_bytes: usize,
    pub default_ttl_secs: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expired_removals: u64,
}

impl<V: CacheValue> TtlCache<V> {
    /// Create a cache; fails fast on invalid configuration
    ///
    /// The background sweep is not started here, see [`TtlCache::start_sweeper`].
    pub fn new(config: CacheConfig) -> Result<Self> {
        config.validate()?;
        let capacity = NonZeroUsize::new(config.capacity)
            .ok_or_else(|| flowgate_core::Error::configuration("cache capacity must be at least 1"))?;

        Ok(Self {
            inner: Arc::new(CacheInner {
                config,
                entries: Mutex::new(LruCache::new(capacity)),
                counters: Counters::default(),
                sweeper: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("capacity", &self.inner.config.capacity)
            .field("default_ttl", &self.inner.config.default_ttl)
            .field("entry_count", &self.inner.entries.lock().len())
            .finish()
    }
}
