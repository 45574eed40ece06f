use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use log::debug;

use crate::kernel::error::BoxError;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::traits::PluginFactory;

/// Builds a fresh factory instance for one plugin instantiation
pub type FactoryConstructor =
    Arc<dyn Fn() -> Result<Box<dyn PluginFactory>, BoxError> + Send + Sync>;

const FACTORY_KIND: &str = "plugin factory";

/// Table of named factory constructors, keyed by factory locator
#[derive(Clone, Default)]
pub struct FactoryRegistry {
    constructors: HashMap<String, FactoryConstructor>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under `locator`
    pub fn register<F>(&mut self, locator: &str, constructor: F) -> Result<(), PluginSystemError>
    where
        F: Fn() -> Result<Box<dyn PluginFactory>, BoxError> + Send + Sync + 'static,
    {
        if self.constructors.contains_key(locator) {
            return Err(PluginSystemError::AlreadyRegistered {
                kind: FACTORY_KIND.to_string(),
                id: locator.to_string(),
            });
        }
        debug!("Registered plugin factory '{}'", locator);
        self.constructors.insert(locator.to_string(), Arc::new(constructor));
        Ok(())
    }

    /// Register a factory type constructed with `Default`
    pub fn register_default<T>(&mut self, locator: &str) -> Result<(), PluginSystemError>
    where
        T: PluginFactory + Default + 'static,
    {
        self.register(locator, || Ok(Box::new(T::default()) as Box<dyn PluginFactory>))
    }

    /// Registered locators, sorted
    pub fn locators(&self) -> Vec<String> {
        let mut locators: Vec<String> = self.constructors.keys().cloned().collect();
        locators.sort();
        locators
    }

    pub fn constructor(&self, locator: &str) -> Option<FactoryConstructor> {
        self.constructors.get(locator).cloned()
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("locators", &self.locators())
            .finish()
    }
}

fn global() -> &'static RwLock<FactoryRegistry> {
    static GLOBAL: OnceLock<RwLock<FactoryRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(FactoryRegistry::new()))
}

/// Register a factory constructor in the process-wide table.
///
/// Call this at program start for every statically linked plugin.
pub fn register_factory<F>(locator: &str, constructor: F) -> Result<(), PluginSystemError>
where
    F: Fn() -> Result<Box<dyn PluginFactory>, BoxError> + Send + Sync + 'static,
{
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(locator, constructor)
}

/// Snapshot of the process-wide factory table
pub fn global_factories() -> FactoryRegistry {
    global().read().unwrap_or_else(PoisonError::into_inner).clone()
}
