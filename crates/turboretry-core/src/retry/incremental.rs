//! Linearly growing retry intervals.

use super::strategy::{
    BackoffStrategy, DEFAULT_FAST_FIRST_RETRY, DEFAULT_INCREMENT, DEFAULT_INITIAL_INTERVAL,
    DEFAULT_RETRY_COUNT, RetryDecision,
};
use std::error::Error;
use std::time::Duration;

/// Retries with a delay that grows by a constant increment per attempt.
///
/// # Mathematical Formula
///
/// For attempt `n` (0-indexed):
/// ```text
/// delay = initial_interval + increment * n
/// ```
///
/// # Examples
///
/// ```rust
/// use turboretry_core::retry::{BackoffStrategy, Incremental};
/// use std::time::Duration;
///
/// let strategy = Incremental::builder()
///     .retry_count(4)
///     .initial_interval(Duration::from_millis(100))
///     .increment(Duration::from_millis(50))
///     .build();
///
/// let err = std::io::Error::other("busy");
/// assert_eq!(strategy.decide(2, &err).delay(), Duration::from_millis(200));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incremental {
    name: String,
    retry_count: u32,
    initial_interval: Duration,
    increment: Duration,
    fast_first_retry: bool,
}

impl Incremental {
    /// Create a new builder for configuring an incremental strategy.
    pub fn builder() -> IncrementalBuilder {
        IncrementalBuilder::default()
    }

    /// The wait before the first retry.
    pub fn initial_interval(&self) -> Duration {
        self.initial_interval
    }

    /// The growth applied per attempt.
    pub fn increment(&self) -> Duration {
        self.increment
    }
}

impl Default for Incremental {
    /// Defaults: 10 retries, starting at 1s and growing by 1s.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BackoffStrategy for Incremental {
    fn name(&self) -> &str {
        &self.name
    }

    fn fast_first_retry(&self) -> bool {
        self.fast_first_retry
    }

    fn max_retries(&self) -> u32 {
        self.retry_count
    }

    fn decide(&self, attempt: u32, _last_error: &(dyn Error + 'static)) -> RetryDecision {
        if attempt >= self.retry_count {
            return RetryDecision::give_up();
        }
        let delay = self
            .initial_interval
            .saturating_add(self.increment.saturating_mul(attempt));
        RetryDecision::retry_after(delay)
    }
}

/// Builder for [`Incremental`].
#[derive(Debug, Default)]
pub struct IncrementalBuilder {
    name: Option<String>,
    retry_count: Option<u32>,
    initial_interval: Option<Duration>,
    increment: Option<Duration>,
    fast_first_retry: Option<bool>,
}

impl IncrementalBuilder {
    /// Set the registry name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the number of retries.
    ///
    /// Default: 10
    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    /// Set the wait before the first retry.
    ///
    /// Default: 1s
    pub fn initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = Some(interval);
        self
    }

    /// Set the growth per attempt.
    ///
    /// Default: 1s
    pub fn increment(mut self, increment: Duration) -> Self {
        self.increment = Some(increment);
        self
    }

    /// Skip the wait before the second attempt.
    ///
    /// Default: true
    pub fn fast_first_retry(mut self, enabled: bool) -> Self {
        self.fast_first_retry = Some(enabled);
        self
    }

    /// Build the strategy, filling unset parameters with defaults.
    pub fn build(self) -> Incremental {
        Incremental {
            name: self.name.unwrap_or_default(),
            retry_count: self.retry_count.unwrap_or(DEFAULT_RETRY_COUNT),
            initial_interval: self.initial_interval.unwrap_or(DEFAULT_INITIAL_INTERVAL),
            increment: self.increment.unwrap_or(DEFAULT_INCREMENT),
            fast_first_retry: self.fast_first_retry.unwrap_or(DEFAULT_FAST_FIRST_RETRY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn err() -> std::io::Error {
        std::io::Error::other("transient")
    }

    #[test]
    fn test_linear_growth() {
        let strategy = Incremental::builder()
            .retry_count(4)
            .initial_interval(Duration::from_millis(100))
            .increment(Duration::from_millis(250))
            .build();

        assert_eq!(strategy.decide(0, &err()).delay(), Duration::from_millis(100));
        assert_eq!(strategy.decide(1, &err()).delay(), Duration::from_millis(350));
        assert_eq!(strategy.decide(2, &err()).delay(), Duration::from_millis(600));
        assert_eq!(strategy.decide(3, &err()).delay(), Duration::from_millis(850));
        assert_eq!(strategy.decide(4, &err()), RetryDecision::give_up());
    }

    #[test]
    fn test_zero_increment_behaves_like_fixed() {
        let strategy = Incremental::builder()
            .retry_count(3)
            .initial_interval(Duration::from_millis(40))
            .increment(Duration::ZERO)
            .build();

        for attempt in 0..3 {
            assert_eq!(strategy.decide(attempt, &err()).delay(), Duration::from_millis(40));
        }
    }

    #[test]
    fn test_builder_defaults() {
        let strategy = Incremental::default();
        assert_eq!(strategy.max_retries(), 10);
        assert_eq!(strategy.initial_interval(), Duration::from_secs(1));
        assert_eq!(strategy.increment(), Duration::from_secs(1));
        assert!(strategy.fast_first_retry());
    }

    proptest! {
        /// Property: the delay at attempt `i` is exactly `initial + increment * i`
        #[test]
        fn prop_delay_is_exact(
            retry_count in 1u32..500,
            initial_ms in 0u64..10_000,
            increment_ms in 0u64..10_000,
            attempt_seed in any::<u32>(),
        ) {
            let attempt = attempt_seed % retry_count;
            let strategy = Incremental::builder()
                .retry_count(retry_count)
                .initial_interval(Duration::from_millis(initial_ms))
                .increment(Duration::from_millis(increment_ms))
                .build();

            let decision = strategy.decide(attempt, &err());
            prop_assert!(decision.should_retry());
            prop_assert_eq!(
                decision.delay(),
                Duration::from_millis(initial_ms + increment_ms * u64::from(attempt))
            );
        }
    }
}
