use super::caller::endpoint_class;
use crate::sync::{deadline_after, FirstTick, PeriodicTask};
use dashmap::DashMap;
use flowgate_core::{
    Error, Result, DEFAULT_ENDPOINT_LIMITS, DEFAULT_RATE_LIMIT_CLEANUP_SECS,
    DEFAULT_RATE_LIMIT_IDLE_RETENTION_SECS, DEFAULT_RATE_LIMIT_REQUESTS,
    DEFAULT_RATE_LIMIT_WINDOW_SECS,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::ops::ControlFlow;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::Instant;

/// Number of busiest callers reported by [`RateLimiter::stats`]
const TOP_CLIENTS: usize = 10;

/// A request budget: at most `max_requests` accepted per sliding `window`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_requests: usize,
    pub window: Duration,
}

impl RateLimit {
    pub const fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    fn validate(&self, what: &str) -> Result<()> {
        if self.max_requests == 0 {
            return Err(Error::configuration(format!(
                "{what}: request limit must be at least 1"
            )));
        }
        if self.window.is_zero() {
            return Err(Error::configuration(format!(
                "{what}: window must be greater than zero"
            )));
        }
        Ok(())
    }
}

/// Configuration for rate limiting
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Budget for keys without a configured limit
    pub default_limit: RateLimit,
    /// How often idle callers are purged
    pub cleanup_interval: Duration,
    /// How long a caller's window must sit empty before it is purged
    pub idle_retention: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            default_limit: RateLimit::new(
                DEFAULT_RATE_LIMIT_REQUESTS,
                Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            ),
            cleanup_interval: Duration::from_secs(DEFAULT_RATE_LIMIT_CLEANUP_SECS),
            idle_retention: Duration::from_secs(DEFAULT_RATE_LIMIT_IDLE_RETENTION_SECS),
        }
    }
}

/// Outcome of a single [`RateLimiter::check_and_consume`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests still available in the current window
    pub remaining: usize,
    /// When the oldest request in the window slides out
    pub reset_at: Instant,
    pub limit: usize,
    pub window: Duration,
}

impl RateLimitDecision {
    pub fn window_seconds(&self) -> u64 {
        self.window.as_secs()
    }

    /// Time until another request could be accepted
    pub fn retry_after(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }
}

/// Per-caller request count, as reported by [`RateLimiter::stats`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientUsage {
    pub key: String,
    pub request_count: usize,
}

/// Snapshot of limiter state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitStats {
    pub total_clients: usize,
    pub total_requests: usize,
    pub top_clients: Vec<ClientUsage>,
    pub configured_limits: usize,
}

/// Sliding window of accepted request timestamps for one key
struct SlidingWindow {
    events: VecDeque<Instant>,
    last_activity: Instant,
}

impl SlidingWindow {
    fn new(now: Instant) -> Self {
        Self {
            events: VecDeque::new(),
            last_activity: now,
        }
    }

    /// Drop events that have slid out of the window
    fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.events.front() {
            if now.saturating_duration_since(oldest) >= window {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }

    fn try_record(&mut self, now: Instant, limit: RateLimit) -> RateLimitDecision {
        self.prune(now, limit.window);
        self.last_activity = now;

        let allowed = self.events.len() < limit.max_requests;
        if allowed {
            self.events.push_back(now);
        }

        let reset_at = self
            .events
            .front()
            .map_or(now, |&oldest| deadline_after(oldest, limit.window));

        RateLimitDecision {
            allowed,
            remaining: limit.max_requests.saturating_sub(self.events.len()),
            reset_at,
            limit: limit.max_requests,
            window: limit.window,
        }
    }

    /// Events still inside the window, without mutating the deque
    fn live_events(&self, now: Instant, window: Duration) -> usize {
        self.events
            .iter()
            .filter(|&&at| now.saturating_duration_since(at) < window)
            .count()
    }

    fn is_idle(&self, now: Instant, retention: Duration) -> bool {
        self.events.is_empty() && now.saturating_duration_since(self.last_activity) >= retention
    }
}

/// Sliding-window rate limiter keyed per caller
///
/// Check-then-record runs under the key's map shard lock, so concurrent
/// checks for the same key can never accept more than the limit. Cloning is
/// cheap and shares state.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<LimiterInner>,
}

struct LimiterInner {
    config: RateLimitConfig,
    windows: DashMap<String, SlidingWindow>,
    limits: RwLock<HashMap<String, RateLimit>>,
    cleanup: Mutex<Option<PeriodicTask>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimitConfig) -> Result<Self> {
        config.default_limit.validate("default rate limit")?;
        if config.cleanup_interval.is_zero() {
            return Err(Error::configuration(
                "rate limiter cleanup interval must be greater than zero",
            ));
        }

        Ok(Self {
            inner: Arc::new(LimiterInner {
                config,
                windows: DashMap::new(),
                limits: RwLock::new(HashMap::new()),
                cleanup: Mutex::new(None),
            }),
        })
    }

    /// Set the budget for an endpoint class or an exact key
    pub fn set_limit(&self, key: &str, max_requests: usize, window: Duration) -> Result<()> {
        let limit = RateLimit::new(max_requests, window);
        limit.validate(key)?;
        self.inner.limits.write().insert(key.to_string(), limit);
        tracing::debug!(
            key = %key,
            max_requests = max_requests,
            window_secs = window.as_secs(),
            "rate limit set"
        );
        Ok(())
    }

    /// Install the standard per-endpoint-class budgets
    pub fn configure_default_limits(&self) {
        let mut limits = self.inner.limits.write();
        for &(class, max_requests, window_secs) in DEFAULT_ENDPOINT_LIMITS {
            limits.insert(
                class.to_string(),
                RateLimit::new(max_requests, Duration::from_secs(window_secs)),
            );
        }
        tracing::info!(classes = DEFAULT_ENDPOINT_LIMITS.len(), "rate limits configured");
    }

    /// Resolve the budget for a key: exact key, then endpoint class, then default
    pub fn limit_for(&self, key: &str) -> RateLimit {
        resolve_limit(&self.inner.limits.read(), key, self.inner.config.default_limit)
    }

    /// Check whether a request for `key` is allowed, recording it if so
    pub fn check_and_consume(&self, key: &str) -> RateLimitDecision {
        let limit = self.limit_for(key);

        let decision = match self.inner.windows.get_mut(key) {
            Some(mut window) => window.try_record(Instant::now(), limit),
            None => {
                let mut window = self
                    .inner
                    .windows
                    .entry(key.to_string())
                    .or_insert_with(|| SlidingWindow::new(Instant::now()));
                window.try_record(Instant::now(), limit)
            }
        };

        if !decision.allowed {
            tracing::warn!(
                key = %key,
                limit = decision.limit,
                window_secs = decision.window_seconds(),
                "rate limit exceeded"
            );
        }

        decision
    }

    /// Remove keys whose window has been empty for the idle retention period
    pub fn cleanup_idle(&self) -> usize {
        Self::cleanup_idle_inner(&self.inner)
    }

    fn cleanup_idle_inner(inner: &LimiterInner) -> usize {
        let now = Instant::now();
        let limits = inner.limits.read().clone();
        let default_limit = inner.config.default_limit;
        let retention = inner.config.idle_retention;
        let before = inner.windows.len();

        inner.windows.retain(|key, window| {
            let limit = resolve_limit(&limits, key, default_limit);
            window.prune(now, limit.window);
            !window.is_idle(now, retention)
        });

        let removed = before.saturating_sub(inner.windows.len());
        tracing::debug!(removed = removed, "rate limiter cleanup completed");
        removed
    }

    /// Start the periodic idle-caller cleanup; a no-op if already running
    pub fn start_cleanup(&self) -> Result<()> {
        let mut slot = self.inner.cleanup.lock();
        if slot.as_ref().is_some_and(PeriodicTask::is_running) {
            return Ok(());
        }

        let weak: Weak<LimiterInner> = Arc::downgrade(&self.inner);
        let task = PeriodicTask::spawn(
            "rate-limit-cleanup",
            self.inner.config.cleanup_interval,
            FirstTick::AfterPeriod,
            move || {
                let flow = match weak.upgrade() {
                    Some(inner) => {
                        Self::cleanup_idle_inner(&inner);
                        ControlFlow::Continue(())
                    }
                    None => ControlFlow::Break(()),
                };
                async move { flow }
            },
        )?;

        *slot = Some(task);
        Ok(())
    }

    /// Stop the background cleanup
    pub fn shutdown(&self) {
        if let Some(task) = self.inner.cleanup.lock().take() {
            task.cancel();
        }
    }

    /// Get rate limiter statistics
    ///
    /// Request counts only include events still inside each key's window.
    pub fn stats(&self) -> RateLimitStats {
        let now = Instant::now();
        let limits = self.inner.limits.read().clone();
        let default_limit = self.inner.config.default_limit;

        let mut clients: Vec<ClientUsage> = self
            .inner
            .windows
            .iter()
            .map(|entry| {
                let limit = resolve_limit(&limits, entry.key(), default_limit);
                ClientUsage {
                    key: entry.key().clone(),
                    request_count: entry.value().live_events(now, limit.window),
                }
            })
            .collect();

        let total_requests = clients.iter().map(|c| c.request_count).sum();
        let total_clients = clients.len();
        clients.sort_by(|a, b| {
            b.request_count
                .cmp(&a.request_count)
                .then_with(|| a.key.cmp(&b.key))
        });
        clients.truncate(TOP_CLIENTS);

        RateLimitStats {
            total_clients,
            total_requests,
            top_clients: clients,
            configured_limits: limits.len(),
        }
    }
}

/// Exact key, then endpoint class, then `default_limit`
fn resolve_limit(
    limits: &HashMap<String, RateLimit>,
    key: &str,
    default_limit: RateLimit,
) -> RateLimit {
    limits
        .get(key)
        .or_else(|| endpoint_class(key).and_then(|class| limits.get(class)))
        .copied()
        .unwrap_or(default_limit)
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("default_limit", &self.inner.config.default_limit)
            .field("tracked_keys", &self.inner.windows.len())
            .finish()
    }
}
