//! Bounded in-memory cache for flowgate
//!
//! Request handlers use this cache to avoid repeating expensive calls to the
//! remote workflow service. Entries expire after a time-to-live; when the
//! cache is full the least recently used entry is evicted. A background sweep
//! removes expired entries that are never read again.

pub mod config;
pub mod core;
pub mod entry;
pub mod keys;

pub use config::CacheConfig;
pub use self::core::{CacheStats, TtlCache};
pub use entry::{CacheEntry, CacheValue};
pub use keys::cache_key;
