use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use libloading::Library;
use log::{debug, info};

use crate::kernel::constants::LOGGER_PLUGIN_NAME;
use crate::kernel::context::PluginContext;
use crate::kernel::error::BoxError;
use crate::kernel::logger::Logger;
use crate::plugin_system::dylib::{self, LibraryError, LibraryPlugin};
use crate::plugin_system::error::{PanicError, PluginSystemError};
use crate::plugin_system::factory::FactoryRegistry;
use crate::plugin_system::resolver::PluginSpec;
use crate::plugin_system::traits::{Plugin, PluginFactory};

/// A plugin produced from a [`PluginSpec`], ready to be registered
pub struct Instantiated {
    pub plugin: Arc<dyn Plugin>,
    /// Logger captured when the plugin is the `Logger` plugin
    pub logger: Option<Arc<dyn Logger>>,
}

/// Turns plugin specs into plugin instances using a factory table
pub struct Instantiator<'a> {
    factories: &'a FactoryRegistry,
}

impl<'a> Instantiator<'a> {
    pub fn new(factories: &'a FactoryRegistry) -> Self {
        Self { factories }
    }

    pub fn instantiate(
        &self,
        spec: &PluginSpec,
        context: &PluginContext,
    ) -> Result<Instantiated, PluginSystemError> {
        let locator = spec.factory_locator.as_str();
        let (factory, library) = self.resolve_factory(locator)?;

        debug!(
            "Invoking factory `{}' for plugin '{}' with args {:?}",
            locator, spec.name, spec.args
        );
        let created = panic::catch_unwind(AssertUnwindSafe(|| {
            factory.create(context, &spec.name, &spec.args)
        }));
        // The factory is only needed for this one call.
        drop(factory);

        let plugin = match created {
            Ok(Ok(Some(plugin))) => plugin,
            Ok(Ok(None)) => {
                return Err(PluginSystemError::plugin_initialization(format!(
                    "failure in factory {}",
                    locator
                )));
            }
            Ok(Err(e)) => return Err(factory_error(locator, e, library.as_ref())),
            Err(payload) => {
                return Err(PluginSystemError::plugin_initialization_caused_by(
                    format!("exception in factory {}", locator),
                    Box::new(PanicError::from_payload(payload.as_ref())),
                ));
            }
        };

        let plugin = match library {
            Some(library) => LibraryPlugin::wrap(plugin, library),
            None => Arc::from(plugin),
        };

        let logger = if spec.name == LOGGER_PLUGIN_NAME {
            let logger_plugin = plugin.as_logger_plugin().ok_or_else(|| {
                PluginSystemError::plugin_initialization(format!(
                    "Plugin.{} does not implement a logger plugin",
                    LOGGER_PLUGIN_NAME
                ))
            })?;
            Some(logger_plugin.logger())
        } else {
            None
        };

        info!("Created plugin '{}' with factory `{}'", spec.name, locator);
        Ok(Instantiated { plugin, logger })
    }

    fn resolve_factory(
        &self,
        locator: &str,
    ) -> Result<(Box<dyn PluginFactory>, Option<Arc<Library>>), PluginSystemError> {
        if let Some(constructor) = self.factories.constructor(locator) {
            let built = panic::catch_unwind(AssertUnwindSafe(|| constructor()));
            return match built {
                Ok(Ok(factory)) => Ok((factory, None)),
                Ok(Err(e)) => Err(PluginSystemError::plugin_initialization_caused_by(
                    format!("unable to instantiate factory {}", locator),
                    e,
                )),
                Err(payload) => Err(PluginSystemError::plugin_initialization_caused_by(
                    format!("unable to instantiate factory {}", locator),
                    Box::new(PanicError::from_payload(payload.as_ref())),
                )),
            };
        }

        match dylib::split_locator(locator) {
            Some((path, symbol)) => {
                let loaded = dylib::load_factory(path, symbol)?;
                Ok((loaded.factory, Some(loaded.library)))
            }
            None => Err(PluginSystemError::plugin_initialization(format!(
                "factory `{}' not found",
                locator
            ))),
        }
    }
}

/// A `PluginInitialization` error from a factory is passed through as is;
/// anything else is wrapped. Errors from a library factory are pinned to the
/// library so their cause can still be displayed after it is released.
fn factory_error(
    locator: &str,
    error: BoxError,
    library: Option<&Arc<Library>>,
) -> PluginSystemError {
    let pin = |error: BoxError| match library {
        Some(library) => LibraryError::pin(error, library),
        None => error,
    };
    let error = match error.downcast::<PluginSystemError>() {
        Ok(e) => match *e {
            PluginSystemError::PluginInitialization { reason, source } => {
                return PluginSystemError::PluginInitialization {
                    reason,
                    source: source.map(pin),
                };
            }
            other => Box::new(other) as BoxError,
        },
        Err(e) => e,
    };
    PluginSystemError::plugin_initialization_caused_by(
        format!("exception in factory {}", locator),
        pin(error),
    )
}
