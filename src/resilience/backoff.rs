//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before the retry that follows `attempt` completed attempts.
///
/// `base * 2^(attempt-1)`, capped at `max`, plus up to 10% jitter.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let delay = match 1u32.checked_shl(attempt - 1) {
        Some(factor) => base.saturating_mul(factor),
        None if base.is_zero() => Duration::ZERO,
        None => Duration::MAX,
    };
    let capped_delay = delay.min(max);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range.is_zero() {
        Duration::ZERO
    } else {
        jitter_range.mul_f64(rand::thread_rng().gen_range(0.0..1.0))
    };

    capped_delay.saturating_add(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_calculation() {
        let base = Duration::from_millis(100);
        let max = Duration::from_millis(2000);

        let b1 = calculate_backoff(1, base, max);
        assert!(b1.as_millis() >= 100 && b1.as_millis() < 110);

        let b2 = calculate_backoff(2, base, max);
        assert!(b2.as_millis() >= 200 && b2.as_millis() < 220);

        let capped = calculate_backoff(10, base, Duration::from_millis(1000));
        assert!(capped.as_millis() >= 1000 && capped.as_millis() < 1100);
    }

    #[test]
    fn test_sub_millisecond_base_is_kept() {
        let base = Duration::from_micros(500);
        let b1 = calculate_backoff(1, base, Duration::from_millis(2));
        assert!(b1 >= base && b1 < Duration::from_micros(550));

        let b3 = calculate_backoff(3, base, Duration::from_millis(2));
        assert!(b3 >= Duration::from_millis(2) && b3 < Duration::from_micros(2200));
    }

    #[test]
    fn test_huge_values_saturate() {
        let delay = calculate_backoff(64, Duration::MAX, Duration::MAX);
        assert_eq!(delay, Duration::MAX);

        let cap = Duration::from_secs(u64::MAX / 2);
        let capped = calculate_backoff(40, Duration::from_secs(1), cap);
        assert!(capped >= cap);
    }

    #[test]
    fn test_zero_base_never_waits() {
        assert_eq!(calculate_backoff(4, Duration::ZERO, Duration::ZERO), Duration::ZERO);
        assert_eq!(calculate_backoff(0, Duration::from_millis(50), Duration::from_secs(1)), Duration::ZERO);
    }
}
