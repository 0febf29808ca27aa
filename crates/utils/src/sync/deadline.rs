use std::time::Duration;
use tokio::time::Instant;

/// Furthest a computed deadline is placed ahead of its base instant
pub const MAX_HORIZON: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// `base + delay`, clamped to [`MAX_HORIZON`] instead of overflowing
pub fn deadline_after(base: Instant, delay: Duration) -> Instant {
    base.checked_add(delay.min(MAX_HORIZON))
        .or_else(|| base.checked_add(Duration::from_secs(24 * 60 * 60)))
        .unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_delay_is_exact() {
        let base = Instant::now();
        assert_eq!(
            deadline_after(base, Duration::from_secs(90)),
            base + Duration::from_secs(90)
        );
    }

    #[test]
    fn test_huge_delay_is_clamped() {
        let base = Instant::now();
        let deadline = deadline_after(base, Duration::from_secs(u64::MAX));
        assert!(deadline > base);
        assert!(deadline.duration_since(base) <= MAX_HORIZON);
        assert_eq!(deadline_after(base, Duration::MAX), deadline);
    }
}
