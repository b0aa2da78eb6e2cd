//! Fixed-interval retries.

use super::strategy::{
    BackoffStrategy, DEFAULT_FAST_FIRST_RETRY, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_INTERVAL,
    RetryDecision,
};
use std::error::Error;
use std::time::Duration;

/// Retries a fixed number of times, waiting the same interval each time.
///
/// A `retry_count` of zero turns the strategy into "no retry": every
/// decision declines without scheduling a wait.
///
/// # Examples
///
/// ```rust
/// use turboretry_core::retry::{BackoffStrategy, FixedInterval};
/// use std::time::Duration;
///
/// let strategy = FixedInterval::builder()
///     .name("fixed")
///     .retry_count(5)
///     .retry_interval(Duration::from_secs(1))
///     .build();
///
/// let err = std::io::Error::other("busy");
/// assert_eq!(strategy.decide(3, &err).delay(), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedInterval {
    name: String,
    retry_count: u32,
    retry_interval: Duration,
    fast_first_retry: bool,
}

impl FixedInterval {
    /// Create a new builder for configuring a fixed-interval strategy.
    pub fn builder() -> FixedIntervalBuilder {
        FixedIntervalBuilder::default()
    }

    /// A strategy that never retries.
    pub fn no_retry() -> Self {
        Self::builder().name("no_retry").retry_count(0).build()
    }

    /// The wait applied between attempts.
    pub fn retry_interval(&self) -> Duration {
        self.retry_interval
    }
}

impl Default for FixedInterval {
    /// Defaults: 10 retries, one second apart, fast first retry enabled.
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BackoffStrategy for FixedInterval {
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
        if self.retry_count == 0 || attempt >= self.retry_count {
            return RetryDecision::give_up();
        }
        RetryDecision::retry_after(self.retry_interval)
    }
}

/// Builder for [`FixedInterval`].
#[derive(Debug, Default)]
pub struct FixedIntervalBuilder {
    name: Option<String>,
    retry_count: Option<u32>,
    retry_interval: Option<Duration>,
    fast_first_retry: Option<bool>,
}

impl FixedIntervalBuilder {
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

    /// Set the wait between attempts.
    ///
    /// Default: 1s
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = Some(interval);
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
    pub fn build(self) -> FixedInterval {
        FixedInterval {
            name: self.name.unwrap_or_default(),
            retry_count: self.retry_count.unwrap_or(DEFAULT_RETRY_COUNT),
            retry_interval: self.retry_interval.unwrap_or(DEFAULT_RETRY_INTERVAL),
            fast_first_retry: self.fast_first_retry.unwrap_or(DEFAULT_FAST_FIRST_RETRY),
        }
    }
}
