//! Retry notifications.
//!
//! A [`RetryObserver`] fans a [`RetryingEvent`] out to every subscribed
//! callback each time a driver decides to retry. Callbacks run synchronously
//! on the thread driving the attempt, before the wait begins.
//!
//! A panicking callback is not isolated: the panic unwinds through the
//! driver and ends the execution.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;
use uuid::Uuid;

/// Payload delivered to retry callbacks.
#[derive(Debug, Clone, Copy)]
pub struct RetryingEvent<'a> {
    /// 1-based number of the retry about to happen
    pub attempt: u32,
    /// The failure that caused the retry
    pub error: &'a (dyn Error + 'static),
    /// Delay computed by the strategy, before any fast-first-retry skip
    pub delay: Duration,
}

type Callback = Arc<dyn Fn(&RetryingEvent<'_>) + Send + Sync>;
type Subscribers = RwLock<Vec<(Uuid, Callback)>>;

/// Multi-subscriber retry notification.
///
/// Cloning an observer yields a handle to the same subscriber list.
///
/// # Examples
///
/// ```rust
/// use turboretry::observer::RetryObserver;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// let observer = RetryObserver::new();
/// let seen = Arc::new(AtomicU32::new(0));
///
/// let subscription = observer.on_retry({
///     let seen = Arc::clone(&seen);
///     move |event| {
///         seen.store(event.attempt, Ordering::SeqCst);
///     }
/// });
///
/// assert_eq!(observer.subscriber_count(), 1);
/// subscription.unsubscribe();
/// assert_eq!(observer.subscriber_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct RetryObserver {
    subscribers: Arc<Subscribers>,
}

impl RetryObserver {
    /// Create an observer with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a callback. Keep the returned [`Subscription`] to remove it
    /// later; dropping the subscription leaves the callback registered.
    pub fn on_retry<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&RetryingEvent<'_>) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(callback)));

        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    /// Number of registered callbacks.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver `event` to every subscriber in subscription order.
    ///
    /// The subscriber list is snapshotted first, so callbacks may subscribe
    /// or unsubscribe without deadlocking.
    pub fn notify(&self, event: &RetryingEvent<'_>) {
        let callbacks: Vec<Callback> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }
}

impl fmt::Debug for RetryObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryObserver")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle for a registered retry callback (allows unsubscription)
#[derive(Debug, Clone)]
pub struct Subscription {
    id: Uuid,
    subscribers: Weak<Subscribers>,
}

impl Subscription {
    /// Remove the callback. Does nothing if the observer is gone.
    pub fn unsubscribe(self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}
