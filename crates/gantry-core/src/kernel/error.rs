//! # Gantry Core Kernel Errors
//!
//! Defines the crate-level error type.
//!
//! [`Error`] wraps the typed errors of each subsystem ([`PluginSystemError`]
//! and [`ConfigError`]) so callers that drive the whole runtime (for example
//! the `gantry` binary) can use a single `Result` alias.
use std::path::PathBuf;
use std::result::Result as StdResult;

use crate::config::error::ConfigError;
use crate::plugin_system::error::PluginSystemError;
use thiserror::Error as ThisError;

/// Boxed error returned by plugin and factory callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error for the Gantry runtime
#[derive(Debug, ThisError)]
pub enum Error {
    /// Specific, typed plugin system error
    #[error("Plugin system error: {0}")]
    PluginSystem(#[from] PluginSystemError),

    /// Specific, typed configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// I/O failure while reading or writing a configuration file.
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::Config(ConfigError::Io {
            source,
            operation: operation.into(),
            path,
        })
    }
}
