//! Synchronous execution loop.

use super::{AttemptError, AttemptState, RetryPolicy, Step};
use std::error::Error;
use std::thread;
use turboretry_core::classify::TransientClassifier;

impl<C> RetryPolicy<C> {
    /// Run `operation` on the calling thread until it succeeds, fails with a
    /// fatal error, exhausts the strategy, or abandons.
    ///
    /// Waits between attempts block the calling thread.
    ///
    /// # Returns
    /// - `Ok(T)`: the successful result, or `T::default()` when the operation
    ///   abandoned without a cause
    /// - `Err(E)`: the last error, unchanged
    ///
    /// # Examples
    ///
    /// ```rust
    /// use turboretry::prelude::*;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::new(
    ///     Incremental::builder()
    ///         .retry_count(2)
    ///         .initial_interval(Duration::from_millis(1))
    ///         .increment(Duration::from_millis(1))
    ///         .build(),
    ///     |err: &std::io::Error| err.kind() == std::io::ErrorKind::TimedOut,
    /// );
    ///
    /// let result: Result<(), std::io::Error> =
    ///     policy.execute(|| Err(std::io::Error::from(std::io::ErrorKind::NotFound).into()));
    /// assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::NotFound);
    /// ```
    pub fn execute<T, E, F>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Result<T, AttemptError<E>>,
        T: Default,
        E: Error + 'static,
        C: TransientClassifier<E>,
    {
        let mut state = AttemptState::new();
        loop {
            let failure = match operation() {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            match self.evaluate(&mut state, failure) {
                Step::Retry { wait, .. } => {
                    if !wait.is_zero() {
                        thread::sleep(wait);
                    }
                }
                Step::Fail(err) => return Err(err),
                Step::Abandoned => return Ok(T::default()),
            }
        }
    }

    /// Run an operation that produces no value. See [`execute`](Self::execute).
    pub fn execute_action<E, F>(&self, operation: F) -> Result<(), E>
    where
        F: FnMut() -> Result<(), AttemptError<E>>,
        E: Error + 'static,
        C: TransientClassifier<E>,
    {
        self.execute(operation)
    }
}

#[cfg(test)]
mod tests {
    use crate::policy::{AttemptError, RetryPolicy};
    use rstest::rstest;
    use std::cell::Cell;
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::{Duration, Instant};
    use turboretry_core::classify::{AlwaysTransient, NeverTransient};
    use turboretry_core::retry::{FixedInterval, Incremental};

    fn fixed(retry_count: u32, interval: Duration) -> FixedInterval {
        FixedInterval::builder()
            .retry_count(retry_count)
            .retry_interval(interval)
            .fast_first_retry(false)
            .build()
    }

    fn counting_policy<C>(policy: &RetryPolicy<C>) -> Arc<AtomicU32> {
        let notifications = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&notifications);
        policy.on_retry(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        notifications
    }

    #[test]
    fn test_success_on_first_attempt() {
        let policy = RetryPolicy::new(fixed(3, Duration::ZERO), AlwaysTransient);
        let result: Result<i32, io::Error> = policy.execute(|| Ok(42));
        assert_eq!(result.unwrap(), 42);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    #[case(7)]
    fn test_always_failing_runs_retry_count_plus_one(#[case] retry_count: u32) {
        let policy = RetryPolicy::new(fixed(retry_count, Duration::ZERO), AlwaysTransient);
        let notifications = counting_policy(&policy);
        let attempts = Cell::new(0u32);

        let result: Result<(), io::Error> = policy.execute(|| {
            attempts.set(attempts.get() + 1);
            Err(io::Error::other(format!("attempt {}", attempts.get())).into())
        });

        assert_eq!(attempts.get(), retry_count + 1);
        assert_eq!(notifications.load(Ordering::SeqCst), retry_count);
        assert_eq!(
            result.unwrap_err().to_string(),
            format!("attempt {}", retry_count + 1)
        );
    }

    #[test]
    fn test_fails_twice_then_succeeds() {
        let policy = RetryPolicy::new(fixed(5, Duration::from_millis(1)), AlwaysTransient);
        let notifications = counting_policy(&policy);
        let mut attempts = 0;

        let result: Result<&str, io::Error> = policy.execute(|| {
            attempts += 1;
            if attempts <= 2 {
                return Err(io::Error::other("flaky").into());
            }
            Ok("done")
        });

        assert_eq!(result.unwrap(), "done");
        assert_eq!(attempts, 3);
        assert_eq!(notifications.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_fatal_error_runs_once() {
        let policy = RetryPolicy::new(fixed(5, Duration::ZERO), NeverTransient);
        let notifications = counting_policy(&policy);
        let mut attempts = 0;

        let result: Result<(), io::Error> = policy.execute(|| {
            attempts += 1;
            Err(io::Error::from(io::ErrorKind::PermissionDenied).into())
        });

        assert_eq!(attempts, 1);
        assert_eq!(notifications.load(Ordering::SeqCst), 0);
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_abandon_with_cause_propagates_cause() {
        let policy = RetryPolicy::new(fixed(5, Duration::ZERO), AlwaysTransient);
        let mut attempts = 0;

        let result: Result<u8, io::Error> = policy.execute(|| {
            attempts += 1;
            Err(AttemptError::abandon_with(io::Error::other("give up")))
        });

        assert_eq!(attempts, 1);
        assert_eq!(result.unwrap_err().to_string(), "give up");
    }

    #[test]
    fn test_abandon_without_cause_returns_default() {
        let policy = RetryPolicy::new(fixed(5, Duration::ZERO), AlwaysTransient);
        let mut attempts = 0;

        let result: Result<Vec<u8>, io::Error> = policy.execute(|| {
            attempts += 1;
            if attempts < 2 {
                return Err(io::Error::other("flaky").into());
            }
            Err(AttemptError::abandon())
        });

        assert_eq!(attempts, 2);
        assert_eq!(result.unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_fast_first_retry_skips_only_first_wait() {
        let interval = Duration::from_millis(40);
        let policy = RetryPolicy::new(
            FixedInterval::builder()
                .retry_count(2)
                .retry_interval(interval)
                .fast_first_retry(true)
                .build(),
            AlwaysTransient,
        );
        let stamps = Mutex::new(Vec::new());

        let _: Result<(), io::Error> = policy.execute(|| {
            stamps.lock().unwrap().push(Instant::now());
            Err(io::Error::other("flaky").into())
        });

        let stamps = stamps.into_inner().unwrap();
        assert_eq!(stamps.len(), 3);
        assert!(stamps[1] - stamps[0] < interval);
        assert!(stamps[2] - stamps[1] >= interval);
    }

    #[test]
    fn test_blocks_for_incremental_delays() {
        let policy = RetryPolicy::new(
            Incremental::builder()
                .retry_count(2)
                .initial_interval(Duration::from_millis(10))
                .increment(Duration::from_millis(10))
                .fast_first_retry(false)
                .build(),
            AlwaysTransient,
        );

        let start = Instant::now();
        let _: Result<(), io::Error> =
            policy.execute(|| Err(io::Error::other("flaky").into()));

        // 10ms + 20ms of waiting
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_observer_sees_attempt_order_and_delay() {
        let policy = RetryPolicy::new(fixed(3, Duration::from_millis(1)), AlwaysTransient);
        let events = Arc::new(Mutex::new(Vec::new()));
        policy.on_retry({
            let events = Arc::clone(&events);
            move |event| {
                events
                    .lock()
                    .unwrap()
                    .push((event.attempt, event.delay, event.error.to_string()))
            }
        });

        let mut n = 0;
        let _: Result<(), io::Error> = policy.execute(|| {
            n += 1;
            Err(io::Error::other(format!("e{n}")).into())
        });

        let events = events.lock().unwrap();
        let expected: Vec<_> = (1..=3)
            .map(|i| (i, Duration::from_millis(1), format!("e{i}")))
            .collect();
        assert_eq!(*events, expected);
    }

    #[test]
    fn test_execute_action() {
        let policy = RetryPolicy::new(fixed(1, Duration::ZERO), AlwaysTransient);
        let mut calls = 0;
        let result: Result<(), io::Error> = policy.execute_action(|| {
            calls += 1;
            if calls == 1 {
                Err(io::Error::other("once"))?;
            }
            Ok(())
        });
        assert!(result.is_ok());
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_many_retries_do_not_grow_stack() {
        let policy = RetryPolicy::new(fixed(100_000, Duration::ZERO), AlwaysTransient);
        let mut attempts = 0u32;
        let result: Result<u32, io::Error> = policy.execute(|| {
            attempts += 1;
            if attempts <= 100_000 {
                return Err(io::Error::other("again").into());
            }
            Ok(attempts)
        });
        assert_eq!(result.unwrap(), 100_001);
    }
}
