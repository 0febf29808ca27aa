use flowgate_core::{
    Error, Result, DEFAULT_JOB_RETENTION_HOURS, DEFAULT_MAX_FAILED_POLLS,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_REQUEST_TIMEOUT_SECS, DEFAULT_POLL_RETRY_ATTEMPTS,
    DEFAULT_POLL_RETRY_BASE_DELAY_MS,
};
use flowgate_utils::RetryConfig;
use std::time::Duration;

/// Construction-time tracker settings
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Period of the background poll loop
    pub poll_interval: Duration,
    /// Backoff applied to each poll within one cycle
    pub retry: RetryConfig,
    /// Upper bound on a single provider call; expiry counts as a network error
    pub request_timeout: Duration,
    /// Failed cycles in a row before a job is forced to `Failed`
    pub max_failed_polls: u32,
    /// Terminal jobs older than this are dropped by the aging sweep
    pub retention: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            retry: RetryConfig {
                max_attempts: DEFAULT_POLL_RETRY_ATTEMPTS,
                initial_delay: Duration::from_millis(DEFAULT_POLL_RETRY_BASE_DELAY_MS),
                ..RetryConfig::network()
            },
            request_timeout: Duration::from_secs(DEFAULT_POLL_REQUEST_TIMEOUT_SECS),
            max_failed_polls: DEFAULT_MAX_FAILED_POLLS,
            retention: Duration::from_secs(DEFAULT_JOB_RETENTION_HOURS * 3600),
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(Error::configuration(
                "tracker poll interval must be greater than zero",
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::configuration(
                "tracker retry attempts must be at least 1",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::configuration(
                "tracker request timeout must be greater than zero",
            ));
        }
        if self.max_failed_polls == 0 {
            return Err(Error::configuration(
                "tracker max failed polls must be at least 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff_doubles_from_base() {
        let config = TrackerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retry.delay_for_attempt(1), Duration::from_millis(500));
        assert_eq!(config.retry.delay_for_attempt(2), Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = TrackerConfig {
            poll_interval: Duration::ZERO,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let config = TrackerConfig {
            request_timeout: Duration::ZERO,
            ..TrackerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
