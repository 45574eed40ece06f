use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use log::{debug, warn};

use crate::kernel::constants::PLUGIN_KIND;
use crate::plugin_system::error::{PanicError, PluginSystemError};
use crate::plugin_system::traits::Plugin;

/// Registry for managing plugins
///
/// Keeps plugins by name and remembers the order they were registered in,
/// which is the order they are initialized in.
#[derive(Default)]
pub struct PluginRegistry {
    /// Registered plugins (using Arc for shared ownership)
    plugins: HashMap<String, Arc<dyn Plugin>>,
    /// Plugin names in registration order
    init_order: Vec<String>,
}

/// A `destroy()` failure that was logged and swallowed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownFailure {
    pub plugin: String,
    pub message: String,
}

/// Outcome of a best-effort teardown pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Number of plugins whose `destroy()` was invoked
    pub destroyed: usize,
    /// Failures raised by `destroy()`, in the order they happened
    pub failures: Vec<TeardownFailure>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record(&mut self, failure: Option<TeardownFailure>) {
        self.destroyed += 1;
        self.failures.extend(failure);
    }
}

impl PluginRegistry {
    /// Create a new, empty plugin registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under `name`, appending it to the init order
    pub fn register_plugin(
        &mut self,
        name: &str,
        plugin: Arc<dyn Plugin>,
    ) -> Result<(), PluginSystemError> {
        if self.plugins.contains_key(name) {
            return Err(PluginSystemError::AlreadyRegistered {
                kind: PLUGIN_KIND.to_string(),
                id: name.to_string(),
            });
        }

        self.plugins.insert(name.to_string(), plugin);
        self.init_order.push(name.to_string());
        debug!("Registered plugin '{}' at position {}", name, self.init_order.len());
        Ok(())
    }

    /// Get a plugin Arc by name
    pub fn get_plugin(&self, name: &str) -> Result<Arc<dyn Plugin>, PluginSystemError> {
        self.plugins
            .get(name)
            .cloned()
            .ok_or_else(|| PluginSystemError::NotRegistered {
                kind: PLUGIN_KIND.to_string(),
                id: name.to_string(),
            })
    }

    /// Check if a plugin is registered by name
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Get the number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Registered plugin names, in init order
    pub fn plugin_names(&self) -> Vec<String> {
        self.init_order.clone()
    }

    /// Iterate over plugins in init order
    pub fn iter_init_order(&self) -> impl Iterator<Item = (&str, &Arc<dyn Plugin>)> {
        self.init_order
            .iter()
            .filter_map(|name| self.plugins.get(name).map(|plugin| (name.as_str(), plugin)))
    }

    /// Destroy every plugin and clear the registry.
    ///
    /// Iterates in map order. A failing or panicking `destroy()` is logged and
    /// recorded in the report; the remaining plugins are still destroyed.
    pub fn destroy_all(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        for (name, plugin) in &self.plugins {
            report.record(destroy_quietly(name, plugin.as_ref()));
        }
        self.plugins.clear();
        self.init_order.clear();
        report
    }
}

/// Call `destroy()` on a plugin, turning an error or panic into a logged
/// [`TeardownFailure`].
pub(crate) fn destroy_quietly(name: &str, plugin: &dyn Plugin) -> Option<TeardownFailure> {
    debug!("Destroying plugin '{}'", name);
    let message = match panic::catch_unwind(AssertUnwindSafe(|| plugin.destroy())) {
        Ok(Ok(())) => return None,
        Ok(Err(e)) => e.to_string(),
        Err(payload) => PanicError::from_payload(payload.as_ref()).to_string(),
    };
    warn!("Ignoring failure while destroying plugin '{}': {}", name, message);
    Some(TeardownFailure {
        plugin: name.to_string(),
        message,
    })
}
