//! Retry policies and their execution drivers.
//!
//! A [`RetryPolicy`] pairs one [`BackoffStrategy`] with one
//! [`TransientClassifier`] and a [`RetryObserver`]. It runs operations either
//! on the calling thread ([`RetryPolicy::execute`]) or as a future
//! ([`RetryPolicy::execute_async`]). Both drivers consult the classifier and
//! the strategy in the same order; they differ only in how they wait.
//!
//! # Decision sequence
//!
//! After each failed attempt:
//!
//! 1. An abandon request stops immediately. A carried cause is surfaced as
//!    the error; without a cause the driver returns `T::default()`.
//! 2. A fatal classification surfaces the error unchanged.
//! 3. A declining strategy surfaces the error unchanged (retries exhausted).
//! 4. Otherwise the observer is notified and the driver waits, except before
//!    the second attempt when the strategy asks for a fast first retry.
//!
//! Only the last error is ever surfaced; earlier causes are dropped.

mod blocking;
mod driver;

pub use driver::Completion;

use crate::observer::{RetryObserver, RetryingEvent, Subscription};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use turboretry_core::classify::{AlwaysTransient, TransientClassifier};
use turboretry_core::retry::{
    BackoffStrategy, ExponentialBackoff, FixedInterval, Incremental, RetryDecision,
};

/// The failure side of an operation run under a [`RetryPolicy`].
///
/// Operations return `Result<T, AttemptError<E>>`. Thanks to the `From`
/// impl, `?` on a `Result<_, E>` inside the operation produces
/// [`AttemptError::Error`] automatically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptError<E> {
    /// The attempt failed; the classifier and strategy decide what happens next
    Error(E),

    /// Stop retrying immediately, optionally surfacing a final cause
    Abandon(Option<E>),
}

impl<E> AttemptError<E> {
    /// Stop retrying without an error. The driver returns `T::default()`.
    pub fn abandon() -> Self {
        Self::Abandon(None)
    }

    /// Stop retrying and surface `cause` as the final error.
    pub fn abandon_with(cause: E) -> Self {
        Self::Abandon(Some(cause))
    }
}

impl<E> From<E> for AttemptError<E> {
    fn from(err: E) -> Self {
        Self::Error(err)
    }
}

/// Per-execution state. Never shared between executions.
#[derive(Debug, Default)]
pub(crate) struct AttemptState {
    /// Retries scheduled so far
    pub(crate) attempt: u32,
}

impl AttemptState {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

/// What a driver does after a failed attempt.
#[derive(Debug)]
pub(crate) enum Step<E> {
    /// Wait, then run the next attempt. `error` is the failure being retried.
    Retry { wait: Duration, error: E },
    /// Surface this error
    Fail(E),
    /// Abandoned without a cause
    Abandoned,
}

/// A backoff strategy, a transient classifier, and retry observers.
///
/// The strategy and classifier are read-only and shared across executions;
/// cloning a policy is cheap and keeps the same observer subscribers.
///
/// # Examples
///
/// ```rust
/// use turboretry::prelude::*;
/// use std::time::Duration;
///
/// let strategy = FixedInterval::builder()
///     .retry_count(3)
///     .retry_interval(Duration::ZERO)
///     .build();
/// let policy = RetryPolicy::new(strategy, AlwaysTransient);
///
/// let mut calls = 0;
/// let result: Result<u32, std::io::Error> = policy.execute(|| {
///     calls += 1;
///     if calls < 3 {
///         Err(std::io::Error::other("flaky"))?
///     }
///     Ok(calls)
/// });
/// assert_eq!(result.unwrap(), 3);
/// ```
#[derive(Clone)]
pub struct RetryPolicy<C = AlwaysTransient> {
    strategy: Arc<dyn BackoffStrategy>,
    classifier: C,
    observer: RetryObserver,
}

impl<C> RetryPolicy<C> {
    /// Create a policy from a strategy and a classifier.
    pub fn new<S>(strategy: S, classifier: C) -> Self
    where
        S: BackoffStrategy + 'static,
    {
        Self::from_shared(Arc::new(strategy), classifier)
    }

    /// Create a policy around a strategy that is already shared, such as one
    /// resolved from a [`StrategyRegistry`](crate::registry::StrategyRegistry).
    pub fn from_shared(strategy: Arc<dyn BackoffStrategy>, classifier: C) -> Self {
        Self {
            strategy,
            classifier,
            observer: RetryObserver::new(),
        }
    }

    /// Replace the classifier, keeping strategy and observers.
    pub fn with_classifier<C2>(self, classifier: C2) -> RetryPolicy<C2> {
        RetryPolicy {
            strategy: self.strategy,
            classifier,
            observer: self.observer,
        }
    }

    /// Use an existing observer, for example one shared by several policies.
    pub fn with_observer(mut self, observer: RetryObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Subscribe to retry notifications.
    pub fn on_retry<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&RetryingEvent<'_>) + Send + Sync + 'static,
    {
        self.observer.on_retry(callback)
    }

    /// The backoff strategy.
    pub fn strategy(&self) -> &Arc<dyn BackoffStrategy> {
        &self.strategy
    }

    /// The transient classifier.
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// The observer notified on every retry.
    pub fn observer(&self) -> &RetryObserver {
        &self.observer
    }

    /// Decide what follows a failed attempt. Shared by both drivers.
    pub(crate) fn evaluate<E>(
        &self,
        state: &mut AttemptState,
        failure: AttemptError<E>,
    ) -> Step<E>
    where
        C: TransientClassifier<E>,
        E: Error + 'static,
    {
        let strategy = self.strategy.name();
        let err = match failure {
            AttemptError::Abandon(Some(cause)) => {
                debug!(
                    strategy = strategy,
                    attempt = state.attempt,
                    error = %cause,
                    "Retry abandoned with cause"
                );
                return Step::Fail(cause);
            }
            AttemptError::Abandon(None) => {
                warn!(
                    strategy = strategy,
                    attempt = state.attempt,
                    "Retry abandoned without cause, returning default value"
                );
                return Step::Abandoned;
            }
            AttemptError::Error(err) => err,
        };

        if !self.classifier.is_transient(&err) {
            debug!(
                strategy = strategy,
                attempt = state.attempt,
                error = %err,
                "Error is not transient"
            );
            return Step::Fail(err);
        }

        let decision: RetryDecision = self.strategy.decide(state.attempt, &err);
        if !decision.should_retry() {
            warn!(
                strategy = strategy,
                attempts = state.attempt + 1,
                error = %err,
                "Retries exhausted"
            );
            return Step::Fail(err);
        }

        let delay = decision.delay();
        self.observer.notify(&RetryingEvent {
            attempt: state.attempt + 1,
            error: &err,
            delay,
        });
        state.attempt += 1;

        let wait = if state.attempt == 1 && self.strategy.fast_first_retry() {
            Duration::ZERO
        } else {
            delay
        };
        debug!(
            strategy = strategy,
            attempt = state.attempt,
            delay_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
            error = %err,
            "Retrying after transient error"
        );
        Step::Retry { wait, error: err }
    }
}

impl RetryPolicy<AlwaysTransient> {
    /// A policy that runs every operation exactly once.
    pub fn no_retry() -> Self {
        Self::new(FixedInterval::no_retry(), AlwaysTransient)
    }

    /// Fixed-interval policy with default parameters.
    pub fn default_fixed() -> Self {
        Self::new(FixedInterval::default(), AlwaysTransient)
    }

    /// Incremental policy with default parameters.
    pub fn default_incremental() -> Self {
        Self::new(Incremental::default(), AlwaysTransient)
    }

    /// Exponential-backoff policy with default parameters.
    pub fn default_exponential() -> Self {
        Self::new(ExponentialBackoff::default(), AlwaysTransient)
    }
}

impl<C> fmt::Debug for RetryPolicy<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("strategy", &self.strategy)
            .field("observer", &self.observer)
            .finish_non_exhaustive()
    }
}
