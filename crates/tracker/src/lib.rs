//! Job tracking for work executed by an external workflow service.
//!
//! ## Key Components
//!
//! - **`JobTracker`**: owns every [`TrackedJob`] and a single background poll
//!   loop that reconciles them against a [`StatusProvider`].
//! - **`StatusProvider`**: the seam to the external job service.
//! - **`job`**: the per-job record and its state machine.

pub mod config;
pub mod job;
pub mod provider;
pub mod tracker;

pub use config::TrackerConfig;
pub use job::{JobState, StepInfo, TrackedJob, TrackerStatistics};
pub use provider::{ExternalJobStatus, ExternalStep, StatusProvider};
pub use tracker::JobTracker;
