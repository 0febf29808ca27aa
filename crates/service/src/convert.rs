//! Component configs derived from [`Settings`]

use flowgate_cache::CacheConfig;
use flowgate_config::{CacheSettings, RateLimitSettings, TrackerSettings};
use flowgate_tracker::TrackerConfig;
use flowgate_utils::{RateLimit, RateLimitConfig, RetryConfig};

pub fn cache_config(settings: &CacheSettings) -> CacheConfig {
    CacheConfig::new(settings.max_entries, settings.default_ttl())
        .with_sweep_interval(settings.sweep_interval())
}

pub fn rate_limit_config(settings: &RateLimitSettings) -> RateLimitConfig {
    RateLimitConfig {
        default_limit: RateLimit::new(settings.default_requests, settings.default_window()),
        cleanup_interval: settings.cleanup_interval(),
        idle_retention: settings.idle_retention(),
    }
}

pub fn tracker_config(settings: &TrackerSettings) -> TrackerConfig {
    TrackerConfig {
        poll_interval: settings.poll_interval(),
        retry: RetryConfig {
            max_attempts: settings.retry_attempts,
            initial_delay: settings.retry_base_delay(),
            ..RetryConfig::network()
        },
        request_timeout: settings.request_timeout(),
        max_failed_polls: settings.max_failed_polls,
        retention: settings.retention(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgate_config::Settings;
    use std::time::Duration;

    #[test]
    fn test_defaults_carry_through() {
        let settings = Settings::default();

        let cache = cache_config(&settings.cache);
        assert_eq!(cache, CacheConfig::default());

        let rate = rate_limit_config(&settings.rate_limit);
        assert_eq!(rate.default_limit, RateLimit::new(100, Duration::from_secs(60)));

        let tracker = tracker_config(&settings.tracker);
        assert_eq!(tracker.poll_interval, Duration::from_secs(5));
        assert_eq!(tracker.retry.initial_delay, Duration::from_millis(500));
        assert_eq!(tracker.max_failed_polls, 3);
        assert_eq!(tracker.request_timeout, Duration::from_secs(30));
    }
}
