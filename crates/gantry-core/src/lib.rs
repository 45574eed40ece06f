pub mod config;
pub mod kernel;
pub mod plugin_system;

// Re-export key public types/traits for easier use by the binary and plugins
pub use config::{Configuration, Properties};
pub use kernel::error::{BoxError, Error, Result};
pub use kernel::{Logger, PluginContext};
pub use plugin_system::{
    FactoryRegistry, LoggerPlugin, Plugin, PluginFactory, PluginManager, PluginSystemError,
    register_factory,
};

#[cfg(test)]
mod tests;
