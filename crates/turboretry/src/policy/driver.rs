//! Asynchronous execution driver.
//!
//! The driver is a single `loop` inside an `async fn`: each retry resumes the
//! same state machine after the wait, so stack depth stays constant no matter
//! how many attempts run. Waits are `tokio` timers raced against the
//! caller's [`CancellationToken`].

use super::{AttemptError, AttemptState, RetryPolicy, Step};
use std::error::Error;
use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use turboretry_core::classify::TransientClassifier;

/// Terminal state of an asynchronous execution.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T, E> {
    /// The operation succeeded, or abandoned without a cause
    Succeeded(T),

    /// The single final error
    Failed(E),

    /// Cancellation was observed before an attempt or during a wait
    Cancelled,
}

impl<T, E> Completion<T, E> {
    /// Whether the execution succeeded.
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Whether the execution failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Whether the execution was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The successful value, if any.
    pub fn succeeded(self) -> Option<T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// The final error, if any.
    pub fn failed(self) -> Option<E> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Convert to a `Result`, mapping cancellation to `None`.
    pub fn into_result(self) -> Option<Result<T, E>> {
        match self {
            Self::Succeeded(value) => Some(Ok(value)),
            Self::Failed(err) => Some(Err(err)),
            Self::Cancelled => None,
        }
    }
}

fn cancellation_requested(cancel: Option<&CancellationToken>) -> bool {
    cancel.is_some_and(CancellationToken::is_cancelled)
}

impl<C> RetryPolicy<C> {
    /// Drive the futures produced by `factory` until one succeeds, a fatal
    /// error occurs, the strategy gives up, the operation abandons, or
    /// `cancel` fires.
    ///
    /// Cancellation is cooperative and checked at two points:
    ///
    /// - Before each attempt. With no earlier attempt the result is
    ///   [`Completion::Cancelled`]; otherwise the earlier attempt's error is
    ///   returned as-is.
    /// - During the wait between attempts, which it cuts short with
    ///   [`Completion::Cancelled`]. A zero-length wait (fast first retry or a
    ///   zero interval) is still a wait: the driver yields once and reports
    ///   [`Completion::Cancelled`] if cancellation arrived meanwhile.
    ///
    /// An attempt already in flight is never interrupted. If it fails after
    /// cancellation was requested, its error is returned without consulting
    /// the classifier or notifying observers.
    ///
    /// An operation that completes on its first poll returns without touching
    /// the timer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use turboretry::prelude::*;
    /// use std::time::Duration;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let policy = RetryPolicy::new(
    ///     FixedInterval::builder()
    ///         .retry_count(3)
    ///         .retry_interval(Duration::from_millis(1))
    ///         .build(),
    ///     AlwaysTransient,
    /// );
    ///
    /// let completion = policy
    ///     .execute_async(|| async { Ok::<_, AttemptError<std::io::Error>>(7) }, None)
    ///     .await;
    /// assert_eq!(completion.succeeded(), Some(7));
    /// # }
    /// ```
    pub async fn execute_async<T, E, F, Fut>(
        &self,
        mut factory: F,
        cancel: Option<&CancellationToken>,
    ) -> Completion<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError<E>>>,
        T: Default,
        E: Error + 'static,
        C: TransientClassifier<E>,
    {
        let mut state = AttemptState::new();
        let mut last_error: Option<E> = None;
        loop {
            if cancellation_requested(cancel) {
                debug!(attempt = state.attempt, "Cancellation requested before attempt");
                return match last_error.take() {
                    Some(err) => Completion::Failed(err),
                    None => Completion::Cancelled,
                };
            }

            let failure = match factory().await {
                Ok(value) => return Completion::Succeeded(value),
                Err(failure) => failure,
            };

            if cancellation_requested(cancel) {
                debug!(
                    attempt = state.attempt,
                    "Cancellation requested while attempt was in flight"
                );
                return match failure {
                    AttemptError::Error(err) | AttemptError::Abandon(Some(err)) => {
                        Completion::Failed(err)
                    }
                    AttemptError::Abandon(None) => Completion::Succeeded(T::default()),
                };
            }

            let wait = match self.evaluate(&mut state, failure) {
                Step::Retry { wait, error } => {
                    last_error = Some(error);
                    wait
                }
                Step::Fail(err) => return Completion::Failed(err),
                Step::Abandoned => return Completion::Succeeded(T::default()),
            };

            if wait.is_zero() {
                tokio::task::yield_now().await;
                if cancellation_requested(cancel) {
                    debug!(attempt = state.attempt, "Cancelled during retry delay");
                    return Completion::Cancelled;
                }
                continue;
            }

            match cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        () = token.cancelled() => {
                            debug!(attempt = state.attempt, "Cancelled during retry delay");
                            return Completion::Cancelled;
                        }
                        () = tokio::time::sleep(wait) => {}
                    }
                }
                None => tokio::time::sleep(wait).await,
            }
        }
    }

    /// Run an operation that produces no value. See
    /// [`execute_async`](Self::execute_async).
    pub async fn execute_action_async<E, F, Fut>(
        &self,
        factory: F,
        cancel: Option<&CancellationToken>,
    ) -> Completion<(), E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), AttemptError<E>>>,
        E: Error + 'static,
        C: TransientClassifier<E>,
    {
        self.execute_async(factory, cancel).await
    }

    /// Start [`execute_async`](Self::execute_async) on the tokio runtime and
    /// return a handle to its completion.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<T, E, F, Fut>(
        &self,
        factory: F,
        cancel: Option<CancellationToken>,
    ) -> JoinHandle<Completion<T, E>>
    where
        C: TransientClassifier<E> + Clone + 'static,
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, AttemptError<E>>> + Send + 'static,
        T: Default + Send + 'static,
        E: Error + Send + 'static,
    {
        let policy = self.clone();
        tokio::spawn(async move { policy.execute_async(factory, cancel.as_ref()).await })
    }
}
