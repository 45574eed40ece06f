use std::sync::Arc;

use crate::kernel::context::PluginContext;
use crate::kernel::error::BoxError;
use crate::kernel::logger::Logger;

/// Core trait that all plugins must implement
///
/// Plugins are shared (`Arc<dyn Plugin>`) between the registry and callers of
/// [`PluginManager::get_plugin`](crate::plugin_system::PluginManager::get_plugin),
/// so lifecycle methods take `&self`.
pub trait Plugin: Send + Sync {
    /// Initialize the plugin. Called once, in load order.
    fn initialize(&self) -> Result<(), BoxError>;

    /// Release the plugin's resources. Failures are logged and ignored by the
    /// manager.
    fn destroy(&self) -> Result<(), BoxError>;

    /// Logger capability. Plugins implementing [`LoggerPlugin`] override this
    /// to return `Some(self)`.
    fn as_logger_plugin(&self) -> Option<&dyn LoggerPlugin> {
        None
    }
}

/// Plugin that provides the runtime logger.
///
/// The plugin configured under the name `Logger` must implement this.
pub trait LoggerPlugin: Plugin {
    /// The logger this plugin installs. The plugin keeps ownership; the
    /// manager only holds a weak reference.
    fn logger(&self) -> Arc<dyn Logger>;
}

/// Creates plugin instances from a configuration entry
pub trait PluginFactory: Send + Sync {
    /// Create the plugin `name` with the arguments left after option
    /// stripping. Returning `Ok(None)` is reported as a factory failure.
    fn create(
        &self,
        context: &PluginContext,
        name: &str,
        args: &[String],
    ) -> Result<Option<Box<dyn Plugin>>, BoxError>;
}
