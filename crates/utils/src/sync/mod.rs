//! Synchronization helpers for background work.
//!
//! - **`periodic`**: a cancellable fixed-interval task driven by the tokio
//!   timer, so tests can run it against the paused virtual clock.
//! - **`deadline`**: overflow-free `Instant + Duration` for caller-supplied
//!   ttls and windows.

pub mod deadline;
pub mod periodic;

pub use deadline::{deadline_after, MAX_HORIZON};
pub use periodic::{FirstTick, PeriodicTask};
