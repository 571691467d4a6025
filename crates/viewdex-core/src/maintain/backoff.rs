use std::time::Duration;

///
/// BackoffPolicy
///
/// Deterministic exponential backoff for store-unavailable retries. The
/// policy only computes delays; the caller owns sleeping, so the indexing
/// layer itself never blocks or reads the clock.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub multiplier: u32,
    pub max_delay: Duration,
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(100),
            multiplier: 2,
            max_delay: Duration::from_secs(30),
            max_attempts: 8,
        }
    }
}

impl BackoffPolicy {
    /// Delay before retry number `attempt` (0-based), capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.saturating_pow(attempt);
        let delay = self.base.saturating_mul(factor);

        delay.min(self.max_delay)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_grow_exponentially_until_capped() {
        let policy = BackoffPolicy::default();

        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
        assert_eq!(policy.delay_for(20), Duration::from_secs(30));
    }

    #[test]
    fn extreme_attempts_do_not_overflow() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay_for(u32::MAX), policy.max_delay);
    }
}
