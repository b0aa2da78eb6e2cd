//! Serializable strategy parameters.
//!
//! [`StrategySettings`] is the shape strategies take in configuration files.
//! Numeric fields are signed because configuration text can express negative
//! values; [`StrategySettings::build`] validates them eagerly and reports the
//! offending field by name.

use crate::error::{Error, Result};
use crate::retry::{
    BackoffStrategy, DEFAULT_DELTA_BACKOFF, DEFAULT_FAST_FIRST_RETRY, DEFAULT_INCREMENT,
    DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_BACKOFF, DEFAULT_MIN_BACKOFF, DEFAULT_RETRY_COUNT,
    DEFAULT_RETRY_INTERVAL, ExponentialBackoff, FixedInterval, Incremental,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Parameters for one named strategy.
///
/// # Examples
///
/// ```rust
/// use turboretry_core::settings::StrategySettings;
///
/// let settings: StrategySettings = serde_json::from_str(r#"{
///     "name": "fixed",
///     "type": "fixed_interval",
///     "retry_count": 3,
///     "retry_interval_ms": 500
/// }"#).unwrap();
///
/// let strategy = settings.build().unwrap();
/// assert_eq!(strategy.name(), "fixed");
/// assert_eq!(strategy.max_retries(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Unique registry name
    pub name: String,

    /// Skip the wait before the second attempt
    #[serde(default = "default_fast_first_retry")]
    pub fast_first_retry: bool,

    /// Strategy-specific parameters
    #[serde(flatten)]
    pub kind: StrategyKind,
}

/// Strategy-specific parameters, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Same wait between every attempt
    FixedInterval {
        /// Number of retries
        #[serde(default = "default_retry_count")]
        retry_count: i64,
        /// Wait between attempts, in milliseconds
        #[serde(default = "default_retry_interval_ms")]
        retry_interval_ms: i64,
    },

    /// Linearly growing wait
    Incremental {
        /// Number of retries
        #[serde(default = "default_retry_count")]
        retry_count: i64,
        /// First wait, in milliseconds
        #[serde(default = "default_initial_interval_ms")]
        initial_interval_ms: i64,
        /// Growth per attempt, in milliseconds
        #[serde(default = "default_increment_ms")]
        increment_ms: i64,
    },

    /// Randomized exponential wait
    ExponentialBackoff {
        /// Number of retries
        #[serde(default = "default_retry_count")]
        retry_count: i64,
        /// Smallest wait, in milliseconds
        #[serde(default = "default_min_backoff_ms")]
        min_backoff_ms: i64,
        /// Largest wait, in milliseconds
        #[serde(default = "default_max_backoff_ms")]
        max_backoff_ms: i64,
        /// Base of the randomized growth, in milliseconds
        #[serde(default = "default_delta_backoff_ms")]
        delta_backoff_ms: i64,
    },
}

impl StrategySettings {
    /// Validate the parameters and construct the strategy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] naming the field when the name is empty,
    /// a count or interval is negative, or `min_backoff_ms` exceeds
    /// `max_backoff_ms`.
    pub fn build(&self) -> Result<Arc<dyn BackoffStrategy>> {
        if self.name.trim().is_empty() {
            return Err(Error::out_of_range("name", "must not be empty"));
        }

        let strategy: Arc<dyn BackoffStrategy> = match self.kind {
            StrategyKind::FixedInterval {
                retry_count,
                retry_interval_ms,
            } => Arc::new(
                FixedInterval::builder()
                    .name(&self.name)
                    .retry_count(count("retry_count", retry_count)?)
                    .retry_interval(millis("retry_interval_ms", retry_interval_ms)?)
                    .fast_first_retry(self.fast_first_retry)
                    .build(),
            ),
            StrategyKind::Incremental {
                retry_count,
                initial_interval_ms,
                increment_ms,
            } => Arc::new(
                Incremental::builder()
                    .name(&self.name)
                    .retry_count(count("retry_count", retry_count)?)
                    .initial_interval(millis("initial_interval_ms", initial_interval_ms)?)
                    .increment(millis("increment_ms", increment_ms)?)
                    .fast_first_retry(self.fast_first_retry)
                    .build(),
            ),
            StrategyKind::ExponentialBackoff {
                retry_count,
                min_backoff_ms,
                max_backoff_ms,
                delta_backoff_ms,
            } => {
                let min_backoff = millis("min_backoff_ms", min_backoff_ms)?;
                let max_backoff = millis("max_backoff_ms", max_backoff_ms)?;
                if min_backoff > max_backoff {
                    return Err(Error::out_of_range(
                        "min_backoff_ms",
                        format!("{min_backoff_ms} exceeds max_backoff_ms {max_backoff_ms}"),
                    ));
                }
                Arc::new(
                    ExponentialBackoff::builder()
                        .name(&self.name)
                        .retry_count(count("retry_count", retry_count)?)
                        .min_backoff(min_backoff)
                        .max_backoff(max_backoff)
                        .delta_backoff(millis("delta_backoff_ms", delta_backoff_ms)?)
                        .fast_first_retry(self.fast_first_retry)
                        .build()?,
                )
            }
        };
        Ok(strategy)
    }
}

fn count(parameter: &'static str, value: i64) -> Result<u32> {
    if value < 0 {
        return Err(Error::out_of_range(
            parameter,
            format!("must not be negative, got {value}"),
        ));
    }
    u32::try_from(value)
        .map_err(|_| Error::out_of_range(parameter, format!("{value} exceeds {}", u32::MAX)))
}

fn millis(parameter: &'static str, value: i64) -> Result<Duration> {
    u64::try_from(value)
        .map(Duration::from_millis)
        .map_err(|_| Error::out_of_range(parameter, format!("must not be negative, got {value}")))
}

fn default_fast_first_retry() -> bool {
    DEFAULT_FAST_FIRST_RETRY
}

fn default_retry_count() -> i64 {
    i64::from(DEFAULT_RETRY_COUNT)
}

fn duration_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

fn default_retry_interval_ms() -> i64 {
    duration_ms(DEFAULT_RETRY_INTERVAL)
}

fn default_initial_interval_ms() -> i64 {
    duration_ms(DEFAULT_INITIAL_INTERVAL)
}

fn default_increment_ms() -> i64 {
    duration_ms(DEFAULT_INCREMENT)
}

fn default_min_backoff_ms() -> i64 {
    duration_ms(DEFAULT_MIN_BACKOFF)
}

fn default_max_backoff_ms() -> i64 {
    duration_ms(DEFAULT_MAX_BACKOFF)
}

fn default_delta_backoff_ms() -> i64 {
    duration_ms(DEFAULT_DELTA_BACKOFF)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fixed(name: &str, retry_count: i64, retry_interval_ms: i64) -> StrategySettings {
        StrategySettings {
            name: name.to_string(),
            fast_first_retry: false,
            kind: StrategyKind::FixedInterval {
                retry_count,
                retry_interval_ms,
            },
        }
    }

    #[test]
    fn test_parse_toml_with_defaults() {
        let settings: StrategySettings = toml::from_str(
            r#"
            name = "backoff"
            type = "exponential_backoff"
            retry_count = 4
            "#,
        )
        .unwrap();

        assert!(settings.fast_first_retry);
        assert_eq!(
            settings.kind,
            StrategyKind::ExponentialBackoff {
                retry_count: 4,
                min_backoff_ms: 1_000,
                max_backoff_ms: 30_000,
                delta_backoff_ms: 10_000,
            }
        );

        let strategy = settings.build().unwrap();
        assert_eq!(strategy.name(), "backoff");
        assert_eq!(strategy.max_retries(), 4);
    }

    #[test]
    fn test_parse_json_incremental() {
        let settings: StrategySettings = serde_json::from_str(
            r#"{"name":"linear","type":"incremental","retry_count":2,
                "initial_interval_ms":100,"increment_ms":50,"fast_first_retry":false}"#,
        )
        .unwrap();

        let strategy = settings.build().unwrap();
        assert!(!strategy.fast_first_retry());
        let err = std::io::Error::other("x");
        assert_eq!(strategy.decide(1, &err).delay(), Duration::from_millis(150));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: std::result::Result<StrategySettings, _> =
            serde_json::from_str(r#"{"name":"x","type":"fibonacci"}"#);
        assert!(result.is_err());
    }

    #[rstest]
    #[case(fixed("f", -1, 100), "retry_count")]
    #[case(fixed("f", 3, -5), "retry_interval_ms")]
    #[case(fixed("", 3, 100), "name")]
    #[case(fixed("   ", 3, 100), "name")]
    #[case(fixed("f", i64::from(u32::MAX) + 1, 100), "retry_count")]
    fn test_validation_names_parameter(
        #[case] settings: StrategySettings,
        #[case] expected: &'static str,
    ) {
        match settings.build() {
            Err(Error::OutOfRange { parameter, .. }) => assert_eq!(parameter, expected),
            other => panic!("Expected OutOfRange for {expected}, got {other:?}"),
        }
    }

    #[rstest]
    #[case(-1, 10, 10, "min_backoff_ms")]
    #[case(10, -1, 10, "max_backoff_ms")]
    #[case(10, 10, -1, "delta_backoff_ms")]
    #[case(50, 10, 10, "min_backoff_ms")]
    fn test_exponential_validation(
        #[case] min_backoff_ms: i64,
        #[case] max_backoff_ms: i64,
        #[case] delta_backoff_ms: i64,
        #[case] expected: &'static str,
    ) {
        let settings = StrategySettings {
            name: "exp".to_string(),
            fast_first_retry: true,
            kind: StrategyKind::ExponentialBackoff {
                retry_count: 3,
                min_backoff_ms,
                max_backoff_ms,
                delta_backoff_ms,
            },
        };

        match settings.build() {
            Err(Error::OutOfRange { parameter, .. }) => assert_eq!(parameter, expected),
            other => panic!("Expected OutOfRange for {expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_retry_fixed_is_valid() {
        let strategy = fixed("none", 0, 0).build().unwrap();
        let err = std::io::Error::other("x");
        assert!(!strategy.decide(0, &err).should_retry());
    }
}
