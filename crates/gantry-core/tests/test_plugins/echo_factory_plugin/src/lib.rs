//! Shared library exporting working and failing plugin factories.

use std::error::Error;
use std::fmt;

use gantry_core::{BoxError, Configuration, Plugin, PluginContext, PluginFactory};

#[derive(Debug)]
struct EchoError {
    message: String,
    cause: Option<Box<EchoError>>,
}

impl EchoError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }
}

impl fmt::Display for EchoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for EchoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}

/// Fails to initialize when `<name>.Fail` is set
struct EchoPlugin {
    name: String,
    fail: bool,
}

impl Plugin for EchoPlugin {
    fn initialize(&self) -> Result<(), BoxError> {
        if self.fail {
            return Err(Box::new(EchoError::new(format!(
                "echo plugin '{}' refused to start",
                self.name
            ))));
        }
        Ok(())
    }

    fn destroy(&self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct EchoFactory;

impl PluginFactory for EchoFactory {
    fn create(
        &self,
        context: &PluginContext,
        name: &str,
        _args: &[String],
    ) -> Result<Option<Box<dyn Plugin>>, BoxError> {
        let fail = context
            .configuration()
            .property(&format!("{}.Fail", name))
            .is_some();
        Ok(Some(Box::new(EchoPlugin {
            name: name.to_string(),
            fail,
        })))
    }
}

/// Every `create` call fails with a two-level error chain
#[derive(Default)]
pub struct RefusingFactory;

impl PluginFactory for RefusingFactory {
    fn create(
        &self,
        _context: &PluginContext,
        name: &str,
        _args: &[String],
    ) -> Result<Option<Box<dyn Plugin>>, BoxError> {
        Err(Box::new(EchoError {
            message: format!("echo factory refused plugin '{}'", name),
            cause: Some(Box::new(EchoError::new("no echo configured"))),
        }))
    }
}

gantry_core::declare_plugin_factory!(create_echo_factory, crate::EchoFactory);
gantry_core::declare_plugin_factory!(create_refusing_factory, crate::RefusingFactory);
