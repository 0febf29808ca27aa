/// Constants used throughout the flowgate codebase
// Environment variable names
pub const FLOWGATE_CONFIG_VAR: &str = "FLOWGATE_CONFIG";
pub const FLOWGATE_LOG_VAR: &str = "FLOWGATE_LOG";
pub const FLOWGATE_CACHE_MAX_SIZE_VAR: &str = "FLOWGATE_CACHE_MAX_SIZE";
pub const FLOWGATE_CACHE_DEFAULT_TTL_VAR: &str = "FLOWGATE_CACHE_DEFAULT_TTL";
pub const FLOWGATE_RATE_LIMIT_REQUESTS_VAR: &str = "FLOWGATE_RATE_LIMIT_REQUESTS";
pub const FLOWGATE_RATE_LIMIT_WINDOW_VAR: &str = "FLOWGATE_RATE_LIMIT_WINDOW";
pub const FLOWGATE_POLL_INTERVAL_VAR: &str = "FLOWGATE_POLL_INTERVAL";
pub const FLOWGATE_MAX_FAILED_POLLS_VAR: &str = "FLOWGATE_MAX_FAILED_POLLS";

// Cache defaults
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_CACHE_SWEEP_SECS: u64 = 60;

// Rate limiter defaults
pub const DEFAULT_RATE_LIMIT_REQUESTS: usize = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
pub const DEFAULT_RATE_LIMIT_CLEANUP_SECS: u64 = 300;
pub const DEFAULT_RATE_LIMIT_IDLE_RETENTION_SECS: u64 = 3600;

/// Endpoint classes and their `(requests, window_secs)` limits
pub const DEFAULT_ENDPOINT_LIMITS: &[(&str, usize, u64)] = &[
    ("auth", 5, 60),
    ("workflow", 50, 60),
    ("upload", 20, 60),
    ("api", 100, 60),
    ("admin", 10, 60),
];

// Job tracker defaults
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_POLL_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_POLL_RETRY_BASE_DELAY_MS: u64 = 500;
pub const DEFAULT_POLL_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_FAILED_POLLS: u32 = 3;
pub const DEFAULT_JOB_RETENTION_HOURS: u64 = 24;

// Pairing defaults
pub const PAIRED_NAME_MARKER: &str = "_paired";
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.7;
