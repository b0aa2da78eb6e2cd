//! Registry configuration loaded from TOML or JSON text.
//!
//! # Format
//!
//! ```toml
//! default_strategy = "fixed"
//!
//! [categories]
//! connection = "backoff"
//!
//! [[strategies]]
//! name = "fixed"
//! type = "fixed_interval"
//! retry_count = 3
//! retry_interval_ms = 500
//!
//! [[strategies]]
//! name = "backoff"
//! type = "exponential_backoff"
//! min_backoff_ms = 100
//! max_backoff_ms = 10000
//! delta_backoff_ms = 500
//! ```
//!
//! Omitted strategy parameters take the documented defaults. Reading the
//! text from disk or the environment is left to the application.

use crate::registry::StrategyRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;
use turboretry_core::error::{Error, Result};
use turboretry_core::settings::StrategySettings;

/// Declarative description of a [`StrategyRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Strategy used for categories without an explicit mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_strategy: Option<String>,

    /// Category name → strategy name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub categories: BTreeMap<String, String>,

    /// Named strategies
    #[serde(default)]
    pub strategies: Vec<StrategySettings>,
}

impl RetryConfig {
    /// Parse TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Parse JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Validate every strategy and build the registry.
    ///
    /// # Errors
    ///
    /// Any error from [`StrategySettings::build`] or [`StrategyRegistry::new`].
    pub fn into_registry(self) -> Result<StrategyRegistry> {
        let strategies = self
            .strategies
            .iter()
            .map(StrategySettings::build)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            strategies = strategies.len(),
            categories = self.categories.len(),
            "Building retry strategy registry from configuration"
        );

        StrategyRegistry::new(
            strategies,
            self.default_strategy.as_deref(),
            self.categories,
        )
    }
}
