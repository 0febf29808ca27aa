//! TTL + LRU cache implementation
//!
//! All entry state lives behind a single mutex so that eviction followed by
//! insertion is atomic with respect to concurrent writers, and the live entry
//! count never exceeds capacity.

mod cleanup;
mod operations;
mod types;

pub use types::{CacheStats, TtlCache};
