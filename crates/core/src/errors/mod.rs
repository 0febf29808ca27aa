//! Error types for flowgate operations

mod builders;
mod types;

pub use types::{Error, ProviderError, Result};
