//! Factory locators that name a symbol in a shared library.
//!
//! A locator of the form `<library-path>:<symbol>` is resolved by loading the
//! library and calling `symbol`, which must have the signature of
//! [`FactoryEntryPoint`]. Use [`declare_plugin_factory!`](crate::declare_plugin_factory)
//! to export one.
//!
//! The entry point hands a `Box<dyn PluginFactory>` across the library
//! boundary, so the library must be built with the same compiler and the same
//! `gantry-core` version as the host.
//!
//! Everything that comes out of a library (plugins, loggers, errors) carries
//! an `Arc<Library>`, so the library stays mapped until the last of them is
//! dropped.
use std::error::Error as StdError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use libloading::{Library, Symbol};
use log::info;

use crate::kernel::error::BoxError;
use crate::kernel::logger::Logger;
use crate::plugin_system::error::{PanicError, PluginSystemError};
use crate::plugin_system::traits::{LoggerPlugin, Plugin, PluginFactory};

/// Signature of the exported factory entry point.
/// Returns a leaked `Box<Box<dyn PluginFactory>>`, or null.
pub type FactoryEntryPoint = unsafe extern "C-unwind" fn() -> *mut Box<dyn PluginFactory>;

/// A factory created by a shared library, with the library that must outlive
/// every plugin it creates.
pub struct LibraryFactory {
    pub factory: Box<dyn PluginFactory>,
    pub library: Arc<Library>,
}

/// Split `<library-path>:<symbol>`. Returns `None` when the locator is not of
/// that form.
pub fn split_locator(locator: &str) -> Option<(&str, &str)> {
    let (path, symbol) = locator.rsplit_once(':')?;
    let valid_symbol = !symbol.is_empty()
        && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !symbol.starts_with(|c: char| c.is_ascii_digit());
    if path.is_empty() || !valid_symbol {
        return None;
    }
    Some((path, symbol))
}

/// Load `path` and obtain a factory from its `symbol` entry point
pub fn load_factory(path: &str, symbol: &str) -> Result<LibraryFactory, PluginSystemError> {
    // SAFETY: loading a library runs its initialisers. Plugin libraries are
    // trusted code named by the runtime configuration.
    let library = unsafe { Library::new(path) }.map_err(|e| {
        PluginSystemError::plugin_initialization_caused_by(
            format!("unable to load library `{}'", path),
            Box::new(e),
        )
    })?;

    let raw = {
        // SAFETY: the symbol type is part of the documented plugin ABI.
        let entry: Symbol<'_, FactoryEntryPoint> = unsafe { library.get(symbol.as_bytes()) }
            .map_err(|e| {
                PluginSystemError::plugin_initialization_caused_by(
                    format!("unable to find symbol `{}' in `{}'", symbol, path),
                    Box::new(e),
                )
            })?;
        let entry = *entry;
        // SAFETY: calling the plugin-provided entry point; panics are caught
        // below so they do not cross back into the manager.
        panic::catch_unwind(AssertUnwindSafe(|| unsafe { entry() })).map_err(|payload| {
            PluginSystemError::plugin_initialization_caused_by(
                format!("unable to instantiate factory `{}:{}'", path, symbol),
                Box::new(PanicError::from_payload(payload.as_ref())),
            )
        })?
    };

    if raw.is_null() {
        return Err(PluginSystemError::plugin_initialization(format!(
            "`{}:{}' does not provide a plugin factory",
            path, symbol
        )));
    }

    // SAFETY: non-null pointers returned by the entry point come from
    // `Box::into_raw` in `declare_plugin_factory!`.
    let factory = *unsafe { Box::from_raw(raw) };
    info!("Loaded plugin factory `{}' from {}", symbol, path);
    Ok(LibraryFactory {
        factory,
        library: Arc::new(library),
    })
}

/// A plugin created by a library factory.
///
/// Fields drop in declaration order, so the plugin is gone before the library
/// handle is released.
pub struct LibraryPlugin {
    plugin: Box<dyn Plugin>,
    library: Arc<Library>,
}

impl LibraryPlugin {
    /// Wrap `plugin`, keeping its logger capability when it has one
    pub fn wrap(plugin: Box<dyn Plugin>, library: Arc<Library>) -> Arc<dyn Plugin> {
        let logger = plugin.as_logger_plugin().map(|logger_plugin| {
            Arc::new(LibraryLogger {
                logger: logger_plugin.logger(),
                _library: library.clone(),
            }) as Arc<dyn Logger>
        });
        let plugin = LibraryPlugin { plugin, library };
        match logger {
            Some(logger) => Arc::new(LibraryLoggerPlugin { plugin, logger }) as Arc<dyn Plugin>,
            None => Arc::new(plugin),
        }
    }
}

impl Plugin for LibraryPlugin {
    fn initialize(&self) -> Result<(), BoxError> {
        self.plugin
            .initialize()
            .map_err(|e| LibraryError::pin(e, &self.library))
    }

    fn destroy(&self) -> Result<(), BoxError> {
        self.plugin
            .destroy()
            .map_err(|e| LibraryError::pin(e, &self.library))
    }
}

struct LibraryLoggerPlugin {
    plugin: LibraryPlugin,
    logger: Arc<dyn Logger>,
}

impl Plugin for LibraryLoggerPlugin {
    fn initialize(&self) -> Result<(), BoxError> {
        self.plugin.initialize()
    }

    fn destroy(&self) -> Result<(), BoxError> {
        self.plugin.destroy()
    }

    fn as_logger_plugin(&self) -> Option<&dyn LoggerPlugin> {
        Some(self)
    }
}

impl LoggerPlugin for LibraryLoggerPlugin {
    fn logger(&self) -> Arc<dyn Logger> {
        self.logger.clone()
    }
}

struct LibraryLogger {
    logger: Arc<dyn Logger>,
    _library: Arc<Library>,
}

impl Logger for LibraryLogger {
    fn print(&self, message: &str) {
        self.logger.print(message);
    }

    fn trace(&self, category: &str, message: &str) {
        self.logger.trace(category, message);
    }

    fn warning(&self, message: &str) {
        self.logger.warning(message);
    }

    fn error(&self, message: &str) {
        self.logger.error(message);
    }
}

/// An error raised by library code, kept together with the library that
/// implements its `Display` and `Drop`.
pub struct LibraryError {
    error: BoxError,
    _library: Arc<Library>,
}

impl LibraryError {
    /// Tie `error` to `library`
    pub fn pin(error: BoxError, library: &Arc<Library>) -> BoxError {
        Box::new(LibraryError {
            error,
            _library: library.clone(),
        })
    }
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl fmt::Debug for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.error, f)
    }
}

impl StdError for LibraryError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.error.source()
    }
}

/// Export a plugin factory entry point from a `cdylib`.
///
/// ```ignore
/// gantry_core::declare_plugin_factory!(create_echo_factory, EchoFactory::default());
/// ```
/// The plugin is then configured as `Plugin.Echo = libecho.so:create_echo_factory`.
#[macro_export]
macro_rules! declare_plugin_factory {
    ($symbol:ident, $constructor:expr) => {
        #[unsafe(no_mangle)]
        #[allow(improper_ctypes_definitions)]
        pub extern "C-unwind" fn $symbol() -> *mut Box<dyn $crate::plugin_system::PluginFactory> {
            let factory: Box<dyn $crate::plugin_system::PluginFactory> = Box::new($constructor);
            Box::into_raw(Box::new(factory))
        }
    };
}
