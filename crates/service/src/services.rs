//! Construction and teardown of the long-lived components

use crate::convert::{cache_config, rate_limit_config, tracker_config};
use flowgate_cache::TtlCache;
use flowgate_config::{Settings, SettingsLoader};
use flowgate_core::Result;
use flowgate_pairing::PairMatcher;
use flowgate_tracker::{JobTracker, StatusProvider};
use flowgate_utils::{CallerIdentity, RateLimitDecision, RateLimiter};
use std::sync::Arc;

/// The process-wide components, constructed explicitly and shut down together
#[derive(Debug, Clone)]
pub struct Services {
    pub cache: TtlCache<serde_json::Value>,
    pub limiter: RateLimiter,
    pub tracker: JobTracker,
    pub pairing: PairMatcher,
}

impl Services {
    /// Build every component from validated settings
    ///
    /// Inside a tokio runtime the cache sweep and rate-limit cleanup start
    /// immediately; the tracker's poll loop starts with the first tracked job.
    pub fn from_settings(settings: &Settings, provider: Arc<dyn StatusProvider>) -> Result<Self> {
        settings.validate()?;

        let cache = TtlCache::new(cache_config(&settings.cache))?;
        let limiter = RateLimiter::new(rate_limit_config(&settings.rate_limit))?;
        for (class, limit) in &settings.rate_limit.limits {
            limiter.set_limit(class, limit.requests, limit.window())?;
        }
        let tracker = JobTracker::new(tracker_config(&settings.tracker), provider)?;
        let pairing = PairMatcher::new()?;

        let services = Self {
            cache,
            limiter,
            tracker,
            pairing,
        };

        if tokio::runtime::Handle::try_current().is_ok() {
            services.cache.start_sweeper()?;
            services.limiter.start_cleanup()?;
        } else {
            tracing::debug!("no tokio runtime, background maintenance not started");
        }

        tracing::info!(
            cache_capacity = settings.cache.max_entries,
            rate_classes = settings.rate_limit.limits.len(),
            poll_interval_secs = settings.tracker.poll_interval_secs,
            "services initialized"
        );
        Ok(services)
    }

    /// Load settings from file and environment, then build
    pub fn load(provider: Arc<dyn StatusProvider>) -> Result<Self> {
        let settings = SettingsLoader::new().load()?;
        Self::from_settings(&settings, provider)
    }

    /// Rate-limit a caller against an endpoint class
    pub fn check_rate_limit(&self, caller: &CallerIdentity, class: &str) -> RateLimitDecision {
        self.limiter.check_and_consume(&caller.rate_limit_key(class))
    }

    /// Cancel every background task; in-flight polls are abandoned
    pub fn shutdown(&self) {
        self.cache.shutdown();
        self.limiter.shutdown();
        self.tracker.shutdown();
        tracing::info!("services shut down");
    }
}
