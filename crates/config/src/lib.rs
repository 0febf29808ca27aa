//! Settings for the flowgate components.
//!
//! Settings are layered: built-in defaults, then an optional JSON file, then
//! individual environment variable overrides. See [`SettingsLoader`].

pub mod loader;
pub mod settings;

pub use loader::SettingsLoader;
pub use settings::{CacheSettings, ClassLimit, RateLimitSettings, Settings, TrackerSettings};
