//! Transient error classification.
//!
//! A [`TransientClassifier`] labels each failure as transient (worth retrying)
//! or fatal. Classifiers are stateless predicates; they are shared freely
//! across concurrent executions.

use std::fmt;

/// Decides whether a failure is transient.
///
/// Implemented for any `Fn(&E) -> bool + Send + Sync` closure, so ad-hoc
/// classifiers need no dedicated type.
///
/// # Examples
///
/// ```rust
/// use turboretry_core::classify::{NeverTransient, TransientClassifier};
/// use std::io;
///
/// let timeouts = |err: &io::Error| err.kind() == io::ErrorKind::TimedOut;
/// let classifier = NeverTransient.or(timeouts);
///
/// assert!(classifier.is_transient(&io::Error::from(io::ErrorKind::TimedOut)));
/// assert!(!classifier.is_transient(&io::Error::from(io::ErrorKind::NotFound)));
/// ```
pub trait TransientClassifier<E: ?Sized>: Send + Sync {
    /// Returns `true` when `error` is expected to clear up on retry.
    fn is_transient(&self, error: &E) -> bool;

    /// Combine with another classifier; the result is transient if either
    /// classifier says so.
    fn or<O>(self, other: O) -> AnyOf<Self, O>
    where
        Self: Sized,
        O: TransientClassifier<E>,
    {
        AnyOf {
            first: self,
            second: other,
        }
    }
}

impl<E, F> TransientClassifier<E> for F
where
    E: ?Sized,
    F: Fn(&E) -> bool + Send + Sync,
{
    fn is_transient(&self, error: &E) -> bool {
        self(error)
    }
}

/// Classifies every error as transient ("retry everything").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysTransient;

impl<E: ?Sized> TransientClassifier<E> for AlwaysTransient {
    fn is_transient(&self, _error: &E) -> bool {
        true
    }
}

/// Classifies every error as fatal ("retry nothing").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeverTransient;

impl<E: ?Sized> TransientClassifier<E> for NeverTransient {
    fn is_transient(&self, _error: &E) -> bool {
        false
    }
}

/// Logical OR of two classifiers, built with [`TransientClassifier::or`].
///
/// The second classifier is only consulted when the first reports fatal.
#[derive(Clone, Copy)]
pub struct AnyOf<A, B> {
    first: A,
    second: B,
}

impl<A, B> AnyOf<A, B> {
    /// Split back into the two component classifiers.
    pub fn into_inner(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<E, A, B> TransientClassifier<E> for AnyOf<A, B>
where
    E: ?Sized,
    A: TransientClassifier<E>,
    B: TransientClassifier<E>,
{
    fn is_transient(&self, error: &E) -> bool {
        self.first.is_transient(error) || self.second.is_transient(error)
    }
}

impl<A, B> fmt::Debug for AnyOf<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyOf").finish_non_exhaustive()
    }
}
