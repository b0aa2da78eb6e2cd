//! Error types for retry configuration and strategy lookup.
//!
//! These errors describe misuse of the retry machinery itself: invalid
//! strategy parameters, unknown or duplicate strategy names, and a missing
//! or already-installed current registry. Failures produced by the operations
//! being retried are never wrapped in this type; the execution drivers hand
//! the caller's own error back unchanged.

use thiserror::Error;

/// Result type alias for fallible retry configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building strategies, registries, or configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A constructor or settings argument is outside its valid range.
    #[error("argument `{parameter}` is out of range: {reason}")]
    OutOfRange {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// Two strategies were registered under the same name.
    #[error("duplicate retry strategy name: {0}")]
    DuplicateStrategy(String),

    /// No strategy is registered under the requested name.
    #[error("unknown retry strategy: {0}")]
    UnknownStrategy(String),

    /// A category mapping refers to a strategy that was never registered.
    #[error("category `{category}` refers to unknown retry strategy `{name}`")]
    UnknownCategoryTarget {
        /// The category being mapped
        category: String,
        /// The missing strategy name
        name: String,
    },

    /// Neither a category mapping nor a default strategy is available.
    #[error("no retry strategy for category `{0}` and no default strategy configured")]
    NoStrategyForCategory(String),

    /// A current registry was already installed and overwriting was refused.
    #[error("a current retry strategy registry is already set")]
    RegistryAlreadySet,

    /// No current registry has been installed.
    #[error("no current retry strategy registry has been set")]
    RegistryNotSet,

    /// Configuration text could not be parsed.
    #[error("invalid retry configuration: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for an [`Error::OutOfRange`] value.
    pub fn out_of_range(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::OutOfRange {
            parameter,
            reason: reason.into(),
        }
    }
}
