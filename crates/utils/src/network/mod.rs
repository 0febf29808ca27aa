//! Network-facing utilities.
//!
//! ## Key Components
//!
//! - **`rate_limit`**: a per-key sliding-window limiter with a background
//!   cleanup of idle callers.
//! - **`caller`**: derivation of rate-limit keys from caller identity.
//! - **`retry`**: exponential backoff retry for transient failures.

pub mod caller;
pub mod rate_limit;
pub mod retry;

pub use caller::CallerIdentity;
pub use rate_limit::{
    ClientUsage, RateLimit, RateLimitConfig, RateLimitDecision, RateLimitStats, RateLimiter,
};
pub use retry::{retry_async, RetryConfig, RetryableError};
