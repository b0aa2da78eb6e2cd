//! The backoff strategy abstraction shared by every retry driver.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Default number of retries for strategies built without an explicit count.
pub const DEFAULT_RETRY_COUNT: u32 = 10;

/// Default wait between retries for [`FixedInterval`](super::FixedInterval).
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Default first wait for [`Incremental`](super::Incremental).
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(1);

/// Default per-attempt growth for [`Incremental`](super::Incremental).
pub const DEFAULT_INCREMENT: Duration = Duration::from_secs(1);

/// Default lower bound for [`ExponentialBackoff`](super::ExponentialBackoff).
pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_secs(1);

/// Default upper bound for [`ExponentialBackoff`](super::ExponentialBackoff).
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Default jitter base for [`ExponentialBackoff`](super::ExponentialBackoff).
pub const DEFAULT_DELTA_BACKOFF: Duration = Duration::from_secs(10);

/// Strategies skip the wait before the second attempt unless told otherwise.
pub const DEFAULT_FAST_FIRST_RETRY: bool = true;

/// The verdict of a [`BackoffStrategy`] for one failed attempt.
///
/// A declined decision always carries a zero delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    should_retry: bool,
    delay: Duration,
}

impl RetryDecision {
    /// Retry after waiting `delay`.
    pub const fn retry_after(delay: Duration) -> Self {
        Self {
            should_retry: true,
            delay,
        }
    }

    /// Do not retry.
    pub const fn give_up() -> Self {
        Self {
            should_retry: false,
            delay: Duration::ZERO,
        }
    }

    /// Whether another attempt is permitted.
    pub const fn should_retry(&self) -> bool {
        self.should_retry
    }

    /// How long to wait before the next attempt.
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

/// A strategy that decides, attempt by attempt, whether to retry and how
/// long to wait.
///
/// Strategies are immutable after construction. All per-execution state
/// (the attempt counter, the last error) is owned by the driver, so a single
/// strategy instance can serve any number of concurrent executions.
///
/// # Examples
///
/// ```rust
/// use turboretry_core::retry::{BackoffStrategy, FixedInterval};
/// use std::time::Duration;
///
/// let strategy = FixedInterval::builder()
///     .retry_count(2)
///     .retry_interval(Duration::from_millis(250))
///     .build();
///
/// let err = std::io::Error::other("timeout");
/// assert!(strategy.decide(0, &err).should_retry());
/// assert!(strategy.decide(1, &err).should_retry());
/// assert!(!strategy.decide(2, &err).should_retry());
/// ```
pub trait BackoffStrategy: fmt::Debug + Send + Sync {
    /// The name this strategy is registered under. May be empty for
    /// strategies that are never placed in a registry.
    fn name(&self) -> &str;

    /// Whether drivers should skip the wait before the second attempt.
    fn fast_first_retry(&self) -> bool;

    /// Maximum number of retries after the initial attempt.
    fn max_retries(&self) -> u32;

    /// Decide what to do after the attempt with 0-based index `attempt`
    /// failed with `last_error`.
    fn decide(&self, attempt: u32, last_error: &(dyn Error + 'static)) -> RetryDecision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_give_up_has_zero_delay() {
        let decision = RetryDecision::give_up();
        assert!(!decision.should_retry());
        assert_eq!(decision.delay(), Duration::ZERO);
    }

    #[test]
    fn test_retry_after() {
        let decision = RetryDecision::retry_after(Duration::from_millis(10));
        assert!(decision.should_retry());
        assert_eq!(decision.delay(), Duration::from_millis(10));
    }
}
