//! # Core Logging Plugin
//!
//! The `Logger` plugin of a Gantry runtime. On `initialize()` it installs a
//! global `tracing` subscriber (filtered by `GANTRY_LOG` or `Logger.Level`)
//! and bridges the `log` facade into it, so messages from `gantry-core` and
//! every other plugin end up in the same output.
//!
//! Configure it as `Plugin.Logger = core-logging [directive]` after calling
//! [`register`], or load it from its shared library with
//! `Plugin.Logger = <path>/libcore_logging.so:create_logging_factory`.
use std::sync::{Arc, Mutex, PoisonError};

use gantry_core::{
    BoxError, Logger, LoggerPlugin, Plugin, PluginContext, PluginFactory, PluginSystemError,
};
use log::{debug, info};

pub mod logger;
pub mod settings;

pub use logger::TracingLogger;
pub use settings::{LogFormat, LogSettings};

/// Locator under which [`register`] installs the factory
pub const FACTORY_LOCATOR: &str = "core-logging";

/// Plugin that owns the process-wide tracing subscriber
pub struct LoggingPlugin {
    settings: LogSettings,
    logger: Arc<TracingLogger>,
    installed: Mutex<bool>,
}

impl LoggingPlugin {
    pub fn new(settings: LogSettings) -> Self {
        Self {
            settings,
            logger: Arc::new(TracingLogger),
            installed: Mutex::new(false),
        }
    }

    pub fn settings(&self) -> &LogSettings {
        &self.settings
    }

    /// True once this instance has installed the global subscriber
    pub fn is_installed(&self) -> bool {
        *self.installed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn install_subscriber(&self) -> Result<bool, BoxError> {
        let filter = self.settings.env_filter()?;
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(self.settings.ansi);

        let installed = match self.settings.format {
            LogFormat::Full => tracing::subscriber::set_global_default(builder.finish()),
            LogFormat::Compact => {
                tracing::subscriber::set_global_default(builder.compact().finish())
            }
            LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
        };
        if installed.is_err() {
            // Another subscriber owns the process; keep logging through it.
            return Ok(false);
        }

        // Ignore failure: the log facade may already be bridged.
        let _ = tracing_log::LogTracer::init();
        Ok(true)
    }
}

impl Plugin for LoggingPlugin {
    fn initialize(&self) -> Result<(), BoxError> {
        let installed = self.install_subscriber()?;
        *self.installed.lock().unwrap_or_else(PoisonError::into_inner) = installed;
        if installed {
            info!("Logging initialized with directive '{}'", self.settings.directive);
        } else {
            debug!("A global tracing subscriber is already installed, reusing it");
        }
        Ok(())
    }

    fn destroy(&self) -> Result<(), BoxError> {
        info!("Shutting down Core Logging Plugin");
        Ok(())
    }

    fn as_logger_plugin(&self) -> Option<&dyn LoggerPlugin> {
        Some(self)
    }
}

impl LoggerPlugin for LoggingPlugin {
    fn logger(&self) -> Arc<dyn Logger> {
        self.logger.clone()
    }
}

/// Creates a [`LoggingPlugin`] from the runtime configuration
#[derive(Debug, Default)]
pub struct LoggingPluginFactory;

impl PluginFactory for LoggingPluginFactory {
    fn create(
        &self,
        context: &PluginContext,
        _name: &str,
        args: &[String],
    ) -> Result<Option<Box<dyn Plugin>>, BoxError> {
        let settings = LogSettings::from_configuration(context.configuration().as_ref(), args)
            .map_err(PluginSystemError::plugin_initialization)?;
        Ok(Some(Box::new(LoggingPlugin::new(settings))))
    }
}

/// Register [`LoggingPluginFactory`] in the process-wide factory table
pub fn register() -> Result<(), PluginSystemError> {
    gantry_core::register_factory(FACTORY_LOCATOR, || {
        Ok(Box::new(LoggingPluginFactory) as Box<dyn PluginFactory>)
    })
}

gantry_core::declare_plugin_factory!(create_logging_factory, crate::LoggingPluginFactory);
