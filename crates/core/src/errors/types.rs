//! Core error type definitions

/// Result type alias for flowgate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for flowgate operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid construction-time settings (cache sizes, windows, intervals)
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The external job service failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A job id is already tracked against a different external id
    #[error("job '{job_id}' is already tracked as '{existing}', refusing to track it as '{requested}'")]
    TrackingConflict {
        job_id: String,
        existing: String,
        requested: String,
    },

    /// The tracker gave up on a job after repeated failed poll cycles
    #[error("lost contact with job service for '{job_id}' after {attempts} consecutive failed polls")]
    TrackingExhausted { job_id: String, attempts: u32 },

    /// A background task was requested outside of a tokio runtime
    #[error("runtime error: {message}")]
    Runtime { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures reported by the external job status provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("network error talking to job service: {0}")]
    Network(String),

    #[error("job service rejected credentials: {0}")]
    Unauthorized(String),

    #[error("job '{0}' not found on job service")]
    NotFound(String),

    #[error("job service returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("job service error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Whether another attempt could plausibly succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Unauthorized(_) | Self::NotFound(_))
    }
}
