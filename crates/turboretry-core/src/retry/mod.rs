//! Backoff strategies.
//!
//! A strategy is a pure decision function: given the 0-based index of a
//! failed attempt, it says whether to try again and how long to wait first.
//! Strategies never sleep and never run operations; the drivers in the
//! `turboretry` crate do that.
//!
//! # Key Types
//!
//! - [`BackoffStrategy`] - Core trait for retry strategies
//! - [`FixedInterval`] - Same wait every time
//! - [`Incremental`] - Linearly growing wait
//! - [`ExponentialBackoff`] - Exponential growth with jitter
//!
//! # Examples
//!
//! ```rust
//! use turboretry_core::retry::{BackoffStrategy, Incremental};
//! use std::time::Duration;
//!
//! let strategy = Incremental::builder()
//!     .retry_count(3)
//!     .initial_interval(Duration::from_millis(100))
//!     .increment(Duration::from_millis(100))
//!     .build();
//!
//! let err = std::io::Error::other("connection reset");
//! let decision = strategy.decide(1, &err);
//! assert!(decision.should_retry());
//! assert_eq!(decision.delay(), Duration::from_millis(200));
//! ```

mod exponential;
mod fixed;
mod incremental;
mod strategy;

pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use fixed::{FixedInterval, FixedIntervalBuilder};
pub use incremental::{Incremental, IncrementalBuilder};
pub use strategy::{
    BackoffStrategy, DEFAULT_DELTA_BACKOFF, DEFAULT_FAST_FIRST_RETRY, DEFAULT_INCREMENT,
    DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF, DEFAULT_RETRY_COUNT,
    DEFAULT_RETRY_INTERVAL, RetryDecision,
};
