//! Exponential backoff with jitter.

use super::strategy::{
    BackoffStrategy, DEFAULT_DELTA_BACKOFF, DEFAULT_FAST_FIRST_RETRY, DEFAULT_MAX_BACKOFF,
    DEFAULT_MIN_BACKOFF, DEFAULT_RETRY_COUNT, RetryDecision,
};
use crate::error::{Error, Result};
use rand::Rng;
use std::time::Duration;

/// Exponential backoff strategy with randomized growth.
///
/// Delays start at `min_backoff` and grow roughly exponentially with the
/// attempt index, capped at `max_backoff`. Each decision draws its own
/// jitter so that many callers sharing one strategy do not retry in lockstep.
///
/// # Mathematical Formula
///
/// For attempt `n` (0-indexed after first failure):
/// ```text
/// jitter = uniform(0.8 * delta_backoff, 1.2 * delta_backoff)
/// delay  = min(min_backoff + (2^n - 1) * jitter, max_backoff)
/// ```
///
/// Every delay lies within `[min_backoff, max_backoff]`.
///
/// # Examples
///
/// ```rust
/// use turboretry_core::retry::{BackoffStrategy, ExponentialBackoff};
/// use std::time::Duration;
///
/// # fn main() -> turboretry_core::Result<()> {
/// let backoff = ExponentialBackoff::builder()
///     .retry_count(5)
///     .min_backoff(Duration::from_millis(100))
///     .max_backoff(Duration::from_secs(30))
///     .delta_backoff(Duration::from_millis(500))
///     .build()?;
///
/// let err = std::io::Error::other("throttled");
/// let delay = backoff.decide(3, &err).delay();
/// assert!(delay >= Duration::from_millis(100) && delay <= Duration::from_secs(30));
/// # Ok(())
/// # }
/// ```
///
/// # Performance Characteristics
///
/// - **Memory**: O(1) - no allocations per decision
/// - **CPU**: O(1) per decision - simple arithmetic + one random number generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExponentialBackoff {
    name: String,
    retry_count: u32,
    min_backoff: Duration,
    max_backoff: Duration,
    delta_backoff: Duration,
    fast_first_retry: bool,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use turboretry_core::retry::ExponentialBackoff;
    /// use std::time::Duration;
    ///
    /// let backoff = ExponentialBackoff::builder()
    ///     .retry_count(5)
    ///     .min_backoff(Duration::from_millis(100))
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }

    /// Lower bound of every delay.
    pub fn min_backoff(&self) -> Duration {
        self.min_backoff
    }

    /// Upper bound of every delay.
    pub fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// Base of the randomized growth term.
    pub fn delta_backoff(&self) -> Duration {
        self.delta_backoff
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        let delta = self.delta_backoff.as_secs_f64();
        let jitter = if delta > 0.0 {
            rand::thread_rng().gen_range(delta * 0.8..=delta * 1.2)
        } else {
            0.0
        };

        let factor = 2f64.powi(i32::try_from(attempt).unwrap_or(i32::MAX)) - 1.0;
        // Keeps `inf * 0` from turning into NaN for very large attempts.
        let growth = if factor == 0.0 || jitter == 0.0 {
            0.0
        } else {
            factor * jitter
        };

        let headroom = self.max_backoff.saturating_sub(self.min_backoff);
        if growth.is_finite() && growth < headroom.as_secs_f64() {
            (self.min_backoff + Duration::from_secs_f64(growth)).min(self.max_backoff)
        } else {
            self.max_backoff
        }
    }
}

impl Default for ExponentialBackoff {
    /// Create an exponential backoff with sensible defaults.
    ///
    /// Defaults:
    /// - `retry_count`: 10
    /// - `min_backoff`: 1s
    /// - `max_backoff`: 30s
    /// - `delta_backoff`: 10s
    /// - `fast_first_retry`: true
    fn default() -> Self {
        Self {
            name: String::new(),
            retry_count: DEFAULT_RETRY_COUNT,
            min_backoff: DEFAULT_MIN_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            delta_backoff: DEFAULT_DELTA_BACKOFF,
            fast_first_retry: DEFAULT_FAST_FIRST_RETRY,
        }
    }
}

impl BackoffStrategy for ExponentialBackoff {
    fn name(&self) -> &str {
        &self.name
    }

    fn fast_first_retry(&self) -> bool {
        self.fast_first_retry
    }

    fn max_retries(&self) -> u32 {
        self.retry_count
    }

    fn decide(&self, attempt: u32, _last_error: &(dyn std::error::Error + 'static)) -> RetryDecision {
        if attempt >= self.retry_count {
            return RetryDecision::give_up();
        }
        RetryDecision::retry_after(self.delay_for(attempt))
    }
}

/// Builder for configuring `ExponentialBackoff`.
///
/// Provides a fluent API for setting retry parameters. [`build`](Self::build)
/// rejects a `min_backoff` larger than `max_backoff`.
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    name: Option<String>,
    retry_count: Option<u32>,
    min_backoff: Option<Duration>,
    max_backoff: Option<Duration>,
    delta_backoff: Option<Duration>,
    fast_first_retry: Option<bool>,
}

impl ExponentialBackoffBuilder {
    /// Set the registry name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the maximum number of retry attempts.
    ///
    /// Default: 10
    pub fn retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = Some(retry_count);
        self
    }

    /// Set the smallest delay.
    ///
    /// Default: 1s
    pub fn min_backoff(mut self, delay: Duration) -> Self {
        self.min_backoff = Some(delay);
        self
    }

    /// Set the largest delay.
    ///
    /// Default: 30s
    pub fn max_backoff(mut self, delay: Duration) -> Self {
        self.max_backoff = Some(delay);
        self
    }

    /// Set the base of the randomized growth term.
    ///
    /// Default: 10s
    pub fn delta_backoff(mut self, delta: Duration) -> Self {
        self.delta_backoff = Some(delta);
        self
    }

    /// Skip the wait before the second attempt.
    ///
    /// Default: true
    pub fn fast_first_retry(mut self, enabled: bool) -> Self {
        self.fast_first_retry = Some(enabled);
        self
    }

    /// Build the `ExponentialBackoff` instance.
    ///
    /// Uses default values for any unset parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] for `min_backoff` when it exceeds
    /// `max_backoff`.
    pub fn build(self) -> Result<ExponentialBackoff> {
        let min_backoff = self.min_backoff.unwrap_or(DEFAULT_MIN_BACKOFF);
        let max_backoff = self.max_backoff.unwrap_or(DEFAULT_MAX_BACKOFF);
        if min_backoff > max_backoff {
            return Err(Error::out_of_range(
                "min_backoff",
                format!("{min_backoff:?} exceeds max_backoff {max_backoff:?}"),
            ));
        }

        Ok(ExponentialBackoff {
            name: self.name.unwrap_or_default(),
            retry_count: self.retry_count.unwrap_or(DEFAULT_RETRY_COUNT),
            min_backoff,
            max_backoff,
            delta_backoff: self.delta_backoff.unwrap_or(DEFAULT_DELTA_BACKOFF),
            fast_first_retry: self.fast_first_retry.unwrap_or(DEFAULT_FAST_FIRST_RETRY),
        })
    }
}
