//! Interface to the external job service

use async_trait::async_trait;
use flowgate_core::ProviderError;
use serde::{Deserialize, Serialize};

/// One step of an external job as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalStep {
    pub id: String,
    pub label: Option<String>,
    pub state: String,
    pub external_job_id: Option<String>,
}

/// Provider-reported state of an external job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalJobStatus {
    /// Raw provider state (`ok`, `error`, `deleted`, `running`, ...)
    pub state: String,
    pub steps: Vec<ExternalStep>,
}

/// Source of truth for external job state
#[async_trait]
pub trait StatusProvider: Send + Sync {
    async fn job_status(&self, external_id: &str) -> Result<ExternalJobStatus, ProviderError>;
}
