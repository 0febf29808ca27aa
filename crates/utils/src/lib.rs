//! Shared runtime utilities for flowgate
//!
//! This crate provides the pieces that every long-lived flowgate component
//! leans on: tracing setup, retry with exponential backoff, a per-caller
//! sliding-window rate limiter, and a cancellable periodic task used for
//! sweeps and polling.

pub mod network;
pub mod sync;
pub mod tracing;

pub use network::*;
pub use sync::*;
