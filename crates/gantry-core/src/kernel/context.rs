use std::fmt;
use std::sync::Arc;

use crate::config::Configuration;

/// Runtime handle passed through to plugin factories.
///
/// The plugin manager never inspects the context beyond reading its
/// configuration; factories receive the same instance the manager was built with.
#[derive(Clone)]
pub struct PluginContext {
    name: String,
    configuration: Arc<dyn Configuration>,
}

impl PluginContext {
    /// Create a context for the runtime named `name`
    pub fn new(name: impl Into<String>, configuration: Arc<dyn Configuration>) -> Self {
        Self {
            name: name.into(),
            configuration,
        }
    }

    /// Name of the runtime that owns this context
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration shared by the runtime and its plugins
    pub fn configuration(&self) -> &Arc<dyn Configuration> {
        &self.configuration
    }
}

impl fmt::Debug for PluginContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginContext")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
