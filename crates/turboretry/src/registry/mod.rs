//! Named strategy registry.
//!
//! A [`StrategyRegistry`] holds every configured [`BackoffStrategy`] by name,
//! an optional default, and a category → name map used to pick a strategy
//! for a class of operations (for example [`category::CONNECTION`] versus
//! [`category::COMMAND`]). All validation happens at construction; the
//! registry is read-only afterwards and safe to share between threads.

mod current;

pub use current::{current, set_current};

use crate::policy::RetryPolicy;
use std::collections::HashMap;
use std::sync::Arc;
use turboretry_core::error::{Error, Result};
use turboretry_core::retry::BackoffStrategy;

/// Well-known category names.
pub mod category {
    /// Establishing connections to a dependency
    pub const CONNECTION: &str = "connection";

    /// Running individual commands over an established connection
    pub const COMMAND: &str = "command";
}

/// Immutable collection of named strategies.
///
/// # Examples
///
/// ```rust
/// use turboretry::prelude::*;
/// use turboretry::registry::{StrategyRegistry, category};
/// use std::time::Duration;
///
/// # fn main() -> turboretry::Result<()> {
/// let registry = StrategyRegistry::builder()
///     .strategy(FixedInterval::builder().name("fixed").retry_count(3).build())
///     .strategy(ExponentialBackoff::builder().name("backoff").build()?)
///     .default_strategy("fixed")
///     .category(category::CONNECTION, "backoff")
///     .build()?;
///
/// assert_eq!(registry.resolve_for_category(category::CONNECTION)?.name(), "backoff");
/// assert_eq!(registry.resolve_for_category(category::COMMAND)?.name(), "fixed");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    strategies: HashMap<String, Arc<dyn BackoffStrategy>>,
    default_strategy: Option<String>,
    categories: HashMap<String, String>,
}

impl StrategyRegistry {
    /// Create a registry from strategies, an optional default name, and a
    /// category map.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfRange`] for a strategy with an empty name
    /// - [`Error::DuplicateStrategy`] when two strategies share a name
    /// - [`Error::UnknownStrategy`] when the default name is not registered
    /// - [`Error::UnknownCategoryTarget`] when a category maps to an
    ///   unregistered name
    pub fn new<I, M>(strategies: I, default_strategy: Option<&str>, categories: M) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<dyn BackoffStrategy>>,
        M: IntoIterator<Item = (String, String)>,
    {
        let mut by_name = HashMap::new();
        for strategy in strategies {
            let name = strategy.name();
            if name.trim().is_empty() {
                return Err(Error::out_of_range(
                    "name",
                    "registered strategies must have a name",
                ));
            }
            if by_name.contains_key(name) {
                return Err(Error::DuplicateStrategy(name.to_string()));
            }
            by_name.insert(name.to_string(), strategy);
        }

        if let Some(name) = default_strategy {
            if !by_name.contains_key(name) {
                return Err(Error::UnknownStrategy(name.to_string()));
            }
        }

        let mut category_map = HashMap::new();
        for (category, name) in categories {
            if !by_name.contains_key(&name) {
                return Err(Error::UnknownCategoryTarget { category, name });
            }
            category_map.insert(category, name);
        }

        Ok(Self {
            strategies: by_name,
            default_strategy: default_strategy.map(str::to_string),
            categories: category_map,
        })
    }

    /// Create a new builder.
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::default()
    }

    /// Look up a strategy by name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownStrategy`] when no strategy has that name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn BackoffStrategy>> {
        self.strategies
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownStrategy(name.to_string()))
    }

    /// Look up the strategy mapped to `category`, falling back to the default.
    ///
    /// # Errors
    ///
    /// [`Error::NoStrategyForCategory`] when the category is unmapped and no
    /// default is configured.
    pub fn resolve_for_category(&self, category: &str) -> Result<Arc<dyn BackoffStrategy>> {
        match self
            .categories
            .get(category)
            .or(self.default_strategy.as_ref())
        {
            Some(name) => self.resolve(name),
            None => Err(Error::NoStrategyForCategory(category.to_string())),
        }
    }

    /// The default strategy, if one was configured.
    pub fn default_strategy(&self) -> Option<Arc<dyn BackoffStrategy>> {
        self.default_strategy
            .as_deref()
            .and_then(|name| self.strategies.get(name).cloned())
    }

    /// Build a [`RetryPolicy`] from the strategy named `name`.
    pub fn policy<C>(&self, name: &str, classifier: C) -> Result<RetryPolicy<C>> {
        Ok(RetryPolicy::from_shared(self.resolve(name)?, classifier))
    }

    /// Build a [`RetryPolicy`] from the strategy for `category`.
    pub fn policy_for_category<C>(&self, category: &str, classifier: C) -> Result<RetryPolicy<C>> {
        Ok(RetryPolicy::from_shared(
            self.resolve_for_category(category)?,
            classifier,
        ))
    }

    /// Registered strategy names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.strategies.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether no strategies are registered.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Builder for [`StrategyRegistry`].
///
/// Validation is deferred to [`build`](Self::build).
#[derive(Debug, Default)]
pub struct StrategyRegistryBuilder {
    strategies: Vec<Arc<dyn BackoffStrategy>>,
    default_strategy: Option<String>,
    categories: Vec<(String, String)>,
}

impl StrategyRegistryBuilder {
    /// Add a strategy.
    pub fn strategy<S>(mut self, strategy: S) -> Self
    where
        S: BackoffStrategy + 'static,
    {
        self.strategies.push(Arc::new(strategy));
        self
    }

    /// Add an already shared strategy.
    pub fn shared_strategy(mut self, strategy: Arc<dyn BackoffStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Set the default strategy name.
    pub fn default_strategy(mut self, name: impl Into<String>) -> Self {
        self.default_strategy = Some(name.into());
        self
    }

    /// Map a category to a strategy name.
    pub fn category(mut self, category: impl Into<String>, name: impl Into<String>) -> Self {
        self.categories.push((category.into(), name.into()));
        self
    }

    /// Validate and build the registry. See [`StrategyRegistry::new`].
    pub fn build(self) -> Result<StrategyRegistry> {
        StrategyRegistry::new(
            self.strategies,
            self.default_strategy.as_deref(),
            self.categories,
        )
    }
}
