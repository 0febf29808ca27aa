use flowgate_core::FLOWGATE_LOG_VAR;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, instrument, span, trace, warn, Level, Span};

/// Initialize the tracing system
///
/// The filter comes from `RUST_LOG`, then `FLOWGATE_LOG`, then defaults to
/// `info`. Output is a compact formatter on stderr, coloured only when stderr
/// is a terminal. Returns an error if a global subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(FLOWGATE_LOG_VAR))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}

/// Create a span covering one poll cycle of the job tracker
pub fn poll_cycle_span(cycle: u64, jobs: usize) -> Span {
    span!(Level::DEBUG, "poll_cycle", cycle = %cycle, jobs = %jobs)
}

/// Emit a structured event for cache lookups
pub fn cache_event(key: &str, hit: bool) {
    if hit {
        debug!(key = %key, "cache_hit");
    } else {
        debug!(key = %key, "cache_miss");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error_not_a_panic() {
        let _ = init();
        assert!(init().is_err());
    }
}
