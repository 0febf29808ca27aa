//! Cache configuration and validation

use flowgate_core::{
    Error, Result, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_SWEEP_SECS, DEFAULT_CACHE_TTL_SECS,
};
use std::time::Duration;

/// Construction-time cache settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries held at once
    pub capacity: usize,
    /// TTL applied when `set` is called without one
    pub default_ttl: Duration,
    /// Period of the background expiry sweep
    pub sweep_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_MAX_ENTRIES,
            default_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_CACHE_SWEEP_SECS),
        }
    }
}

impl CacheConfig {
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            capacity,
            default_ttl,
            ..Self::default()
        }
    }

    pub fn with_sweep_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Reject settings the cache cannot operate with
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::configuration("cache capacity must be at least 1"));
        }
        if self.default_ttl.is_zero() {
            return Err(Error::configuration(
                "cache default ttl must be greater than zero",
            ));
        }
        if self.sweep_interval.is_zero() {
            return Err(Error::configuration(
                "cache sweep interval must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CacheConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_values() {
        assert!(CacheConfig::new(0, Duration::from_secs(1)).validate().is_err());
        assert!(CacheConfig::new(10, Duration::ZERO).validate().is_err());
        assert!(CacheConfig::new(10, Duration::from_secs(1))
            .with_sweep_interval(Duration::ZERO)
            .validate()
            .is_err());
    }
}
