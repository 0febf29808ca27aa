//! Core error types and constants shared by every `flowgate` crate.
//!
//! ## Key Components
//!
//! - **`errors`**: the workspace-wide `Error` enum and `Result` alias, plus
//!   `ProviderError` for failures reported by the external job service.
//! - **`constants`**: environment variable names and default tunables.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, ProviderError, Result},
};
