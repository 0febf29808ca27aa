//! flowgate: the concurrent core behind a workflow service front end.
//!
//! [`Services`] owns one instance each of the response cache, the rate
//! limiter and the job tracker, built from [`Settings`], plus a pair matcher
//! for grouping uploads. Request handlers share it behind an `Arc`.

pub mod convert;
pub mod services;

pub use flowgate_cache::{cache_key, CacheConfig, CacheStats, TtlCache};
pub use flowgate_config::{Settings, SettingsLoader};
pub use flowgate_core::{Error, ProviderError, Result};
pub use flowgate_pairing::{FileDescriptor, PairMatcher, PairingResult};
pub use flowgate_tracker::{JobState, JobTracker, StatusProvider, TrackedJob};
pub use flowgate_utils::{CallerIdentity, RateLimitDecision, RateLimiter};
pub use services::Services;
