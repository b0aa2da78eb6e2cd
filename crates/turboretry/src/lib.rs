//! # TurboRetry
//!
//! Retry execution for fallible operations, supporting:
//! - Pluggable transient-error classification
//! - Fixed, incremental, and jittered exponential backoff
//! - Blocking and `tokio`-based asynchronous drivers
//! - Cooperative cancellation through [`CancellationToken`]
//! - Retry notifications for logging and metrics
//! - Named strategy registries configured from TOML or JSON
//!
//! ## Quick Start
//!
//! ```rust
//! use turboretry::prelude::*;
//! use std::time::Duration;
//!
//! #[derive(Debug)]
//! enum FetchError {
//!     Timeout,
//!     NotFound,
//! }
//!
//! impl std::fmt::Display for FetchError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "{self:?}")
//!     }
//! }
//!
//! impl std::error::Error for FetchError {}
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let policy = RetryPolicy::new(
//!     ExponentialBackoff::builder()
//!         .retry_count(4)
//!         .min_backoff(Duration::from_millis(1))
//!         .max_backoff(Duration::from_millis(20))
//!         .delta_backoff(Duration::from_millis(2))
//!         .build()
//!         .unwrap(),
//!     |err: &FetchError| matches!(err, FetchError::Timeout),
//! );
//!
//! policy.on_retry(|event| {
//!     tracing::warn!(attempt = event.attempt, error = %event.error, "retrying");
//! });
//!
//! let mut calls = 0;
//! let completion = policy
//!     .execute_async(
//!         || {
//!             calls += 1;
//!             let outcome = if calls < 3 { Err(FetchError::Timeout) } else { Ok(calls) };
//!             async move { outcome.map_err(AttemptError::Error) }
//!         },
//!         None,
//!     )
//!     .await;
//!
//! assert_eq!(completion.succeeded(), Some(3));
//!
//! let result: Result<(), FetchError> = policy.execute(|| Err(FetchError::NotFound.into()));
//! assert!(matches!(result, Err(FetchError::NotFound)));
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use config::RetryConfig;
pub use observer::{RetryObserver, RetryingEvent, Subscription};
pub use policy::{AttemptError, Completion, RetryPolicy};
pub use registry::StrategyRegistry;
pub use turboretry_core::{Error, Result, classify, retry, settings};

// Module declarations
pub mod config;
pub mod observer;
pub mod policy;
pub mod registry;

// Re-export key dependencies for convenience
pub use tokio_util::sync::CancellationToken;

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use turboretry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::RetryConfig;
    pub use crate::observer::{RetryObserver, RetryingEvent, Subscription};
    pub use crate::policy::{AttemptError, Completion, RetryPolicy};
    pub use crate::registry::{StrategyRegistry, category};
    pub use tokio_util::sync::CancellationToken;
    pub use turboretry_core::prelude::*;
}
