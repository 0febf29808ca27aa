//! Layered settings loader
//!
//! Precedence, lowest first: defaults, the JSON file (explicit path or the one
//! named by `FLOWGATE_CONFIG`), then per-field environment overrides.

use crate::settings::Settings;
use flowgate_core::{
    Error, Result, FLOWGATE_CACHE_DEFAULT_TTL_VAR, FLOWGATE_CACHE_MAX_SIZE_VAR,
    FLOWGATE_CONFIG_VAR, FLOWGATE_MAX_FAILED_POLLS_VAR, FLOWGATE_POLL_INTERVAL_VAR,
    FLOWGATE_RATE_LIMIT_REQUESTS_VAR, FLOWGATE_RATE_LIMIT_WINDOW_VAR,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Loads [`Settings`] from defaults, file and environment
pub struct SettingsLoader {
    /// Explicit config file; otherwise `FLOWGATE_CONFIG` is consulted
    file: Option<PathBuf>,
    /// Whether to apply environment overrides
    use_env: bool,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            use_env: true,
        }
    }

    /// Load from this file instead of the one named by `FLOWGATE_CONFIG`
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Ignore environment variables entirely
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    /// Load and validate settings
    pub fn load(self) -> Result<Settings> {
        let file = self.file.or_else(|| {
            self.use_env
                .then(|| std::env::var_os(FLOWGATE_CONFIG_VAR).map(PathBuf::from))
                .flatten()
        });

        let mut settings = match file {
            Some(path) => Self::load_file(&path)?,
            None => Settings::default(),
        };

        if self.use_env {
            apply_env_overrides(&mut settings, |name| std::env::var(name).ok())?;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn load_file(path: &Path) -> Result<Settings> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        let settings = serde_json::from_str(&content).map_err(|e| {
            Error::json(format!("invalid config file '{}'", path.display()), e)
        })?;

        tracing::debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }
}

/// Apply per-field overrides looked up through `lookup`
///
/// A present but unparsable value is an error rather than being skipped.
pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = parse_var(&lookup, FLOWGATE_CACHE_MAX_SIZE_VAR)? {
        settings.cache.max_entries = v;
    }
    if let Some(v) = parse_var(&lookup, FLOWGATE_CACHE_DEFAULT_TTL_VAR)? {
        settings.cache.default_ttl_secs = v;
    }
    if let Some(v) = parse_var(&lookup, FLOWGATE_RATE_LIMIT_REQUESTS_VAR)? {
        settings.rate_limit.default_requests = v;
    }
    if let Some(v) = parse_var(&lookup, FLOWGATE_RATE_LIMIT_WINDOW_VAR)? {
        settings.rate_limit.default_window_secs = v;
    }
    if let Some(v) = parse_var(&lookup, FLOWGATE_POLL_INTERVAL_VAR)? {
        settings.tracker.poll_interval_secs = v;
    }
    if let Some(v) = parse_var(&lookup, FLOWGATE_MAX_FAILED_POLLS_VAR)? {
        settings.tracker.max_failed_polls = v;
    }
    Ok(())
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| Error::configuration(format!("{name}='{raw}' is not valid: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut settings = Settings::default();
        let lookup = lookup_from(&[
            (FLOWGATE_CACHE_MAX_SIZE_VAR, "50"),
            (FLOWGATE_POLL_INTERVAL_VAR, " 2 "),
        ]);
        apply_env_overrides(&mut settings, lookup).unwrap();
        assert_eq!(settings.cache.max_entries, 50);
        assert_eq!(settings.tracker.poll_interval_secs, 2);
        assert_eq!(settings.rate_limit.default_requests, 100);
    }

    #[test]
    fn test_unparsable_override_is_an_error() {
        let mut settings = Settings::default();
        let lookup = lookup_from(&[(FLOWGATE_RATE_LIMIT_WINDOW_VAR, "a minute")]);
        let err = apply_env_overrides(&mut settings, lookup).unwrap_err();
        assert!(err.to_string().contains(FLOWGATE_RATE_LIMIT_WINDOW_VAR));
    }

    #[test]
    fn test_without_env_uses_defaults() {
        let settings = SettingsLoader::new().without_env().load().unwrap();
        assert_eq!(settings, Settings::default());
    }
}
