use std::fmt::{self, Debug};
use std::panic;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::{debug, info};

use crate::kernel::constants::INIT_PLUGINS_PROPERTY;
use crate::kernel::context::PluginContext;
use crate::kernel::logger::Logger;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::factory::{FactoryRegistry, global_factories};
use crate::plugin_system::instantiator::Instantiator;
use crate::plugin_system::lifecycle::{self, InitFault};
use crate::plugin_system::registry::{PluginRegistry, TeardownReport};
use crate::plugin_system::resolver::SpecResolver;
use crate::plugin_system::traits::Plugin;

/// Loads, initializes and destroys the plugins of one runtime.
///
/// Every public operation takes the same lock for its whole duration, so a
/// plugin whose `initialize()` blocks also blocks every other caller.
pub struct PluginManager {
    /// `None` means factories are taken from the process-wide table
    factories: Option<FactoryRegistry>,
    resolver: SpecResolver,
    state: Mutex<ManagerState>,
}

struct ManagerState {
    /// `None` once the manager has been destroyed
    context: Option<Arc<PluginContext>>,
    registry: PluginRegistry,
    logger: Option<Weak<dyn Logger>>,
    initialized: bool,
}

impl PluginManager {
    /// Create a manager that resolves factories from the process-wide table
    pub fn new(context: PluginContext) -> Self {
        Self::build(context, None)
    }

    /// Create a manager with its own factory table
    pub fn with_factories(context: PluginContext, factories: FactoryRegistry) -> Self {
        Self::build(context, Some(factories))
    }

    fn build(context: PluginContext, factories: Option<FactoryRegistry>) -> Self {
        Self {
            factories,
            resolver: SpecResolver::default(),
            state: Mutex::new(ManagerState {
                context: Some(Arc::new(context)),
                registry: PluginRegistry::new(),
                logger: None,
                initialized: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the plugins defined in the configuration.
    ///
    /// Plugins named in `PluginLoadOrder` are loaded first, in that order,
    /// then every other `Plugin.*` entry. Each plugin's own command-line
    /// options are removed from `cmd_args`. Unless `InitPlugins` is set to a
    /// value `<= 0`, the loaded plugins are initialized before returning.
    pub fn load_plugins(&self, cmd_args: &mut Vec<String>) -> Result<(), PluginSystemError> {
        let mut state = self.lock();
        let context = state.context.clone().ok_or(PluginSystemError::ManagerDestroyed)?;
        let config = context.configuration().clone();

        let specs = {
            let registry = &state.registry;
            self.resolver
                .resolve(&*config, cmd_args, |name| registry.has_plugin(name))?
        };
        info!("Loading {} plugin(s)", specs.len());

        let global;
        let factories = match &self.factories {
            Some(factories) => factories,
            None => {
                global = global_factories();
                &global
            }
        };
        let instantiator = Instantiator::new(factories);

        for spec in &specs {
            let instantiated = instantiator.instantiate(spec, &context)?;
            state.registry.register_plugin(&spec.name, instantiated.plugin)?;
            if let Some(logger) = instantiated.logger {
                debug!("Captured logger from plugin '{}'", spec.name);
                state.logger = Some(Arc::downgrade(&logger));
            }
        }

        // An application can set InitPlugins=0 to interact with the plugins
        // before they are initialized.
        if config.int_property_with_default(INIT_PLUGINS_PROPERTY, 1) > 0 {
            Self::initialize_locked(state)
        } else {
            info!("{} <= 0, deferring plugin initialization", INIT_PLUGINS_PROPERTY);
            Ok(())
        }
    }

    /// Initialize every registered plugin in registration order.
    ///
    /// If one fails, the plugins initialized before it are destroyed in
    /// reverse order and the failure is returned (a panic is resumed). Fails
    /// with `Initialization` when called again after a success.
    pub fn initialize_plugins(&self) -> Result<(), PluginSystemError> {
        Self::initialize_locked(self.lock())
    }

    fn initialize_locked(mut state: MutexGuard<'_, ManagerState>) -> Result<(), PluginSystemError> {
        if state.context.is_none() {
            return Err(PluginSystemError::ManagerDestroyed);
        }
        if state.initialized {
            return Err(PluginSystemError::Initialization {
                reason: "plugins already initialized".to_string(),
            });
        }

        match lifecycle::initialize_all(&state.registry) {
            Ok(()) => {
                state.initialized = true;
                Ok(())
            }
            Err(InitFault::Failed { name, source }) => {
                Err(PluginSystemError::PluginFailed { name, source })
            }
            Err(InitFault::Panicked { name, payload }) => {
                // Release the lock first so the manager stays usable.
                drop(state);
                debug!("Resuming panic raised by plugin '{}'", name);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Get a plugin by name
    pub fn get_plugin(&self, name: &str) -> Result<Arc<dyn Plugin>, PluginSystemError> {
        let state = self.lock();
        if state.context.is_none() {
            return Err(PluginSystemError::ManagerDestroyed);
        }
        state.registry.get_plugin(name)
    }

    /// Register a plugin created outside of `load_plugins`
    pub fn add_plugin(&self, name: &str, plugin: Arc<dyn Plugin>) -> Result<(), PluginSystemError> {
        let mut state = self.lock();
        if state.context.is_none() {
            return Err(PluginSystemError::ManagerDestroyed);
        }
        state.registry.register_plugin(name, plugin)
    }

    /// Names of the registered plugins, in init order
    pub fn plugin_names(&self) -> Vec<String> {
        self.lock().registry.plugin_names()
    }

    /// Logger provided by the `Logger` plugin, if one was loaded and is still alive
    pub fn logger(&self) -> Option<Arc<dyn Logger>> {
        self.lock().logger.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().initialized
    }

    pub fn is_destroyed(&self) -> bool {
        self.lock().context.is_none()
    }

    /// Destroy every plugin and release the context and logger.
    ///
    /// Failures from individual plugins are logged and returned in the report,
    /// never raised. Calling this again is a no-op.
    pub fn destroy(&self) -> TeardownReport {
        Self::destroy_locked(&mut self.lock())
    }

    fn destroy_locked(state: &mut ManagerState) -> TeardownReport {
        if state.context.is_none() {
            return TeardownReport::default();
        }

        let report = state.registry.destroy_all();
        info!(
            "Destroyed {} plugin(s), {} failure(s) ignored",
            report.destroyed,
            report.failures.len()
        );
        state.logger = None;
        state.context = None;
        report
    }
}

impl Drop for PluginManager {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        Self::destroy_locked(state);
    }
}

impl Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Avoid locking in Debug
        f.debug_struct("PluginManager")
            .field("factories", &self.factories)
            .finish_non_exhaustive()
    }
}
