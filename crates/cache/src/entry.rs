//! Cache entry and value sizing

use std::sync::Arc;
use tokio::time::Instant;

/// Values the cache can hold
///
/// `approx_bytes` feeds the memory estimate in [`crate::CacheStats`]; the
/// default is the shallow size of the value.
pub trait CacheValue: Clone + Send + Sync + 'static {
    fn approx_bytes(&self) -> usize {
        std::mem::size_of_val(self)
    }
}

impl CacheValue for String {
    fn approx_bytes(&self) -> usize {
        self.len()
    }
}

impl CacheValue for Vec<u8> {
    fn approx_bytes(&self) -> usize {
        self.len()
    }
}

impl CacheValue for serde_json::Value {
    fn approx_bytes(&self) -> usize {
        self.to_string().len()
    }
}

impl<T: CacheValue> CacheValue for Arc<T> {
    fn approx_bytes(&self) -> usize {
        self.as_ref().approx_bytes()
    }
}

/// A stored value with its lifetime
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    /// When the key was first stored; kept across refreshes
    pub created_at: Instant,
    /// The entry is logically absent from this instant on
    pub expires_at: Instant,
    pub(crate) approx_bytes: usize,
}

impl<V: CacheValue> CacheEntry<V> {
    pub(crate) fn new(value: V, created_at: Instant, expires_at: Instant) -> Self {
        let approx_bytes = value.approx_bytes();
        Self {
            value,
            created_at,
            expires_at,
            approx_bytes,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
