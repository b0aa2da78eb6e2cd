//! Process-wide current registry.
//!
//! Applications that configure retry strategies once at startup can install
//! the resulting registry here and look it up from anywhere. Library code
//! should prefer receiving a [`StrategyRegistry`] explicitly.

use super::StrategyRegistry;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;
use turboretry_core::error::{Error, Result};

static CURRENT: RwLock<Option<Arc<StrategyRegistry>>> = RwLock::new(None);

/// Install `registry` as the current registry.
///
/// With `reject_if_already_set`, an existing registry is kept and
/// [`Error::RegistryAlreadySet`] is returned; otherwise it is replaced.
pub fn set_current(
    registry: impl Into<Arc<StrategyRegistry>>,
    reject_if_already_set: bool,
) -> Result<()> {
    let mut slot = CURRENT.write().unwrap_or_else(PoisonError::into_inner);
    if reject_if_already_set && slot.is_some() {
        return Err(Error::RegistryAlreadySet);
    }

    let registry = registry.into();
    debug!(strategies = registry.len(), "Installing current retry strategy registry");
    *slot = Some(registry);
    Ok(())
}

/// The current registry.
///
/// # Errors
///
/// [`Error::RegistryNotSet`] before [`set_current`] has succeeded.
pub fn current() -> Result<Arc<StrategyRegistry>> {
    CURRENT
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(Error::RegistryNotSet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use turboretry_core::retry::FixedInterval;

    fn registry(name: &str) -> StrategyRegistry {
        StrategyRegistry::builder()
            .strategy(FixedInterval::builder().name(name).build())
            .default_strategy(name)
            .build()
            .unwrap()
    }

    // The slot is process-wide, so every transition is checked in one test.
    #[test]
    fn test_current_registry_lifecycle() {
        assert_eq!(current().unwrap_err(), Error::RegistryNotSet);

        set_current(registry("first"), true).unwrap();
        assert_eq!(current().unwrap().names(), vec!["first"]);

        let err = set_current(registry("second"), true).unwrap_err();
        assert_eq!(err, Error::RegistryAlreadySet);
        assert_eq!(current().unwrap().names(), vec!["first"]);

        set_current(Arc::new(registry("third")), false).unwrap();
        assert_eq!(
            current().unwrap().default_strategy().unwrap().name(),
            "third"
        );
    }
}
