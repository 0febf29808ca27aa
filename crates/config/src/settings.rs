//! Settings types and validation

use flowgate_core::{
    Error, Result, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_SWEEP_SECS, DEFAULT_CACHE_TTL_SECS,
    DEFAULT_ENDPOINT_LIMITS, DEFAULT_JOB_RETENTION_HOURS, DEFAULT_MAX_FAILED_POLLS,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_REQUEST_TIMEOUT_SECS, DEFAULT_POLL_RETRY_ATTEMPTS,
    DEFAULT_POLL_RETRY_BASE_DELAY_MS,
    DEFAULT_RATE_LIMIT_CLEANUP_SECS, DEFAULT_RATE_LIMIT_IDLE_RETENTION_SECS,
    DEFAULT_RATE_LIMIT_REQUESTS, DEFAULT_RATE_LIMIT_WINDOW_SECS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Top-level settings; missing sections and fields take their defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheSettings,
    pub rate_limit: RateLimitSettings,
    pub tracker: TrackerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub max_entries: usize,
    pub default_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            default_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            sweep_interval_secs: DEFAULT_CACHE_SWEEP_SECS,
        }
    }
}

impl CacheSettings {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// A `(requests, window)` limit for one endpoint class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLimit {
    pub requests: usize,
    pub window_secs: u64,
}

impl ClassLimit {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub default_requests: usize,
    pub default_window_secs: u64,
    pub cleanup_interval_secs: u64,
    pub idle_retention_secs: u64,
    /// Per-class limits keyed by class tag (`auth`, `workflow`, ...)
    pub limits: BTreeMap<String, ClassLimit>,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        let limits = DEFAULT_ENDPOINT_LIMITS
            .iter()
            .map(|&(class, requests, window_secs)| {
                (
                    class.to_string(),
                    ClassLimit {
                        requests,
                        window_secs,
                    },
                )
            })
            .collect();

        Self {
            default_requests: DEFAULT_RATE_LIMIT_REQUESTS,
            default_window_secs: DEFAULT_RATE_LIMIT_WINDOW_SECS,
            cleanup_interval_secs: DEFAULT_RATE_LIMIT_CLEANUP_SECS,
            idle_retention_secs: DEFAULT_RATE_LIMIT_IDLE_RETENTION_SECS,
            limits,
        }
    }
}

impl RateLimitSettings {
    pub fn default_window(&self) -> Duration {
        Duration::from_secs(self.default_window_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn idle_retention(&self) -> Duration {
        Duration::from_secs(self.idle_retention_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub poll_interval_secs: u64,
    pub retry_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub max_failed_polls: u32,
    pub retention_hours: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            retry_attempts: DEFAULT_POLL_RETRY_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_POLL_RETRY_BASE_DELAY_MS,
            request_timeout_secs: DEFAULT_POLL_REQUEST_TIMEOUT_SECS,
            max_failed_polls: DEFAULT_MAX_FAILED_POLLS,
            retention_hours: DEFAULT_JOB_RETENTION_HOURS,
        }
    }
}

impl TrackerSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_hours.saturating_mul(3600))
    }
}

fn require_nonzero(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::configuration(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(())
}

impl Settings {
    /// Reject values the components cannot run with, naming the offending field
    pub fn validate(&self) -> Result<()> {
        require_nonzero("cache.max_entries", self.cache.max_entries as u64)?;
        require_nonzero("cache.default_ttl_secs", self.cache.default_ttl_secs)?;
        require_nonzero("cache.sweep_interval_secs", self.cache.sweep_interval_secs)?;

        let rate = &self.rate_limit;
        require_nonzero("rate_limit.default_requests", rate.default_requests as u64)?;
        require_nonzero("rate_limit.default_window_secs", rate.default_window_secs)?;
        require_nonzero("rate_limit.cleanup_interval_secs", rate.cleanup_interval_secs)?;
        for (class, limit) in &rate.limits {
            require_nonzero(
                &format!("rate_limit.limits.{class}.requests"),
                limit.requests as u64,
            )?;
            require_nonzero(
                &format!("rate_limit.limits.{class}.window_secs"),
                limit.window_secs,
            )?;
        }

        require_nonzero("tracker.poll_interval_secs", self.tracker.poll_interval_secs)?;
        require_nonzero("tracker.retry_attempts", u64::from(self.tracker.retry_attempts))?;
        require_nonzero(
            "tracker.request_timeout_secs",
            self.tracker.request_timeout_secs,
        )?;
        require_nonzero(
            "tracker.max_failed_polls",
            u64::from(self.tracker.max_failed_polls),
        )?;

        Ok(())
    }
}
