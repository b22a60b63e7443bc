//! Bounded retry policy for upstream calls.
//!
//! Delays grow exponentially from `base_delay`, are capped at `max_delay`, and
//! carry "equal jitter": half the capped delay is fixed, the other half random.

use std::time::Duration;

use rand::Rng;

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(8000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Always at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// Upper bound of the delay after `failed_attempts` consecutive failures.
    pub fn ceiling_for(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }

    /// Jittered delay to wait after `failed_attempts` consecutive failures.
    pub fn delay_for(&self, failed_attempts: u32) -> Duration {
        let ceiling = self.ceiling_for(failed_attempts).as_millis() as u64;
        let floor = ceiling / 2;
        if ceiling == floor {
            return Duration::from_millis(ceiling);
        }
        Duration::from_millis(rand::rng().random_range(floor..=ceiling))
    }
}

impl Default for RetryPolicy {
    /// A single attempt. Retries are opt-in.
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_never_allows_zero_attempts() {
        assert_eq!(RetryPolicy::new(0).max_attempts, 1);
        assert_eq!(RetryPolicy::new(4).max_attempts, 4);
    }

    #[test]
    fn test_default_is_a_single_attempt() {
        assert_eq!(RetryPolicy::default().max_attempts, 1);
    }

    #[test]
    fn test_ceiling_doubles_then_caps() {
        let policy = RetryPolicy::new(3);
        assert_eq!(policy.ceiling_for(1), Duration::from_millis(1000));
        assert_eq!(policy.ceiling_for(2), Duration::from_millis(2000));
        assert_eq!(policy.ceiling_for(3), Duration::from_millis(4000));
        assert_eq!(policy.ceiling_for(4), Duration::from_millis(8000));
        assert_eq!(policy.ceiling_for(30), Duration::from_millis(8000));
    }

    #[test]
    fn test_delay_stays_within_jitter_band() {
        let policy = RetryPolicy::new(3);
        for failed in 1..=6 {
            let ceiling = policy.ceiling_for(failed);
            for _ in 0..50 {
                let delay = policy.delay_for(failed);
                assert!(delay <= ceiling, "delay {delay:?} above ceiling {ceiling:?}");
                assert!(delay >= ceiling / 2, "delay {delay:?} below floor");
            }
        }
    }

    #[test]
    fn test_zero_base_delay_never_sleeps() {
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        };
        assert_eq!(policy.delay_for(2), Duration::ZERO);
    }
}
