#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the TurboRetry ecosystem.
//!
//! This crate provides the runtime-free building blocks that the execution
//! drivers in `turboretry` are assembled from:
//!
//! - **Transient classification** via the `TransientClassifier` trait
//!   - "retry everything" and "retry nothing" baselines
//!   - OR-composition to widen a base classifier
//! - **Backoff strategies** via the `BackoffStrategy` trait
//!   - Fixed interval
//!   - Incremental (linear) growth
//!   - Exponential backoff with jitter
//! - **Strategy settings** deserializable from configuration text
//!
//! # Examples
//!
//! Using the prelude for convenient imports:
//!
//! ```rust
//! use turboretry_core::prelude::*;
//! use std::time::Duration;
//!
//! let strategy = FixedInterval::builder()
//!     .retry_count(3)
//!     .retry_interval(Duration::from_millis(100))
//!     .build();
//!
//! let classifier = NeverTransient.or(|err: &std::io::Error| {
//!     err.kind() == std::io::ErrorKind::TimedOut
//! });
//!
//! let err = std::io::Error::from(std::io::ErrorKind::TimedOut);
//! assert!(classifier.is_transient(&err));
//! assert!(strategy.decide(0, &err).should_retry());
//! ```

pub mod classify;
pub mod error;
pub mod retry;
pub mod settings;

pub use error::{Error, Result};

/// Convenient re-exports of commonly used items.
///
/// Import all core abstractions with:
///
/// ```rust
/// use turboretry_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::classify::{AlwaysTransient, AnyOf, NeverTransient, TransientClassifier};
    pub use crate::retry::{
        BackoffStrategy, ExponentialBackoff, FixedInterval, Incremental, RetryDecision,
    };
    pub use crate::settings::{StrategyKind, StrategySettings};
}
