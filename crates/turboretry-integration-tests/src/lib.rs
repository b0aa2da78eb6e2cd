//! Integration tests and utilities for the TurboRetry workspace
//!
//! This crate exercises `turboretry-core` strategies through the
//! `turboretry` drivers and registry, including strategies defined outside
//! either crate.

use std::error::Error;
use std::time::Duration;
use turboretry_core::retry::{BackoffStrategy, RetryDecision};

/// Strategy that retries a fixed number of times and doubles its wait each
/// time, with no jitter. Used to check that third-party strategies plug into
/// the registry and drivers.
#[derive(Debug, Clone)]
pub struct Doubling {
    name: String,
    retry_count: u32,
    first: Duration,
}

impl Doubling {
    /// Create a doubling strategy.
    pub fn new(name: impl Into<String>, retry_count: u32, first: Duration) -> Self {
        Self {
            name: name.into(),
            retry_count,
            first,
        }
    }
}

impl BackoffStrategy for Doubling {
    fn name(&self) -> &str {
        &self.name
    }

    fn fast_first_retry(&self) -> bool {
        false
    }

    fn max_retries(&self) -> u32 {
        self.retry_count
    }

    fn decide(&self, attempt: u32, _last_error: &(dyn Error + 'static)) -> RetryDecision {
        if attempt >= self.retry_count {
            return RetryDecision::give_up();
        }
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        RetryDecision::retry_after(self.first.saturating_mul(factor))
    }
}
