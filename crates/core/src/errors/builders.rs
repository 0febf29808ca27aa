//! Builder methods for creating errors with context

use super::types::Error;

impl Error {
    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a runtime error
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Error::Runtime {
            message: message.into(),
        }
    }

    /// Create a tracking conflict error
    #[must_use]
    pub fn tracking_conflict(
        job_id: impl Into<String>,
        existing: impl Into<String>,
        requested: impl Into<String>,
    ) -> Self {
        Error::TrackingConflict {
            job_id: job_id.into(),
            existing: existing.into(),
            requested: requested.into(),
        }
    }

    /// Create a JSON error with a source
    #[must_use]
    pub fn json(message: impl Into<String>, source: serde_json::Error) -> Self {
        Error::Json {
            message: message.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;

    #[test]
    fn test_configuration_display() {
        let err = Error::configuration("cache.max_entries must be at least 1");
        assert_eq!(
            err.to_string(),
            "configuration error: cache.max_entries must be at least 1"
        );
    }

    #[test]
    fn test_provider_error_converts() {
        let err: Error = ProviderError::NotFound("inv-1".to_string()).into();
        assert!(matches!(err, Error::Provider(ProviderError::NotFound(_))));
        assert_eq!(err.to_string(), "job 'inv-1' not found on job service");
    }

    #[test]
    fn test_provider_retry_classification() {
        assert!(ProviderError::Network("reset".into()).is_retryable());
        assert!(ProviderError::Other("500".into()).is_retryable());
        assert!(!ProviderError::NotFound("x".into()).is_retryable());
        assert!(!ProviderError::Unauthorized("bad key".into()).is_retryable());
    }

    #[test]
    fn test_tracking_conflict_message() {
        let err = Error::tracking_conflict("job-1", "inv-a", "inv-b");
        let msg = err.to_string();
        assert!(msg.contains("job-1"));
        assert!(msg.contains("inv-a"));
        assert!(msg.contains("inv-b"));
    }
}
