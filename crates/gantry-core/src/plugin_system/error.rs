//! # Gantry Core Plugin System Errors
//!
//! Defines error types specific to the plugin lifecycle manager.
//!
//! [`PluginSystemError`] covers registry misuse (duplicate or unknown names,
//! use after teardown), repeated initialization, and every failure raised
//! while resolving, instantiating or initializing plugins.
use std::any::Any;

use crate::kernel::error::BoxError;

#[derive(Debug, thiserror::Error)]
pub enum PluginSystemError {
    #[error("{kind} `{id}' is already registered")]
    AlreadyRegistered { kind: String, id: String },

    #[error("no {kind} is registered with id `{id}'")]
    NotRegistered { kind: String, id: String },

    #[error("plugin manager has been destroyed")]
    ManagerDestroyed,

    #[error("initialization error: {reason}")]
    Initialization { reason: String },

    #[error("plugin initialization failed: {reason}")]
    PluginInitialization {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A plugin's `initialize()` failed; the already initialized plugins were
    /// rolled back. `source` is the error the plugin returned.
    #[error("plugin `{name}' failed to initialize: {source}")]
    PluginFailed {
        name: String,
        #[source]
        source: BoxError,
    },
}

impl PluginSystemError {
    pub fn plugin_initialization(reason: impl Into<String>) -> Self {
        PluginSystemError::PluginInitialization {
            reason: reason.into(),
            source: None,
        }
    }

    pub fn plugin_initialization_caused_by(reason: impl Into<String>, source: BoxError) -> Self {
        PluginSystemError::PluginInitialization {
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Reason string of a `PluginInitialization` error
    pub fn reason(&self) -> Option<&str> {
        match self {
            PluginSystemError::PluginInitialization { reason, .. }
            | PluginSystemError::Initialization { reason } => Some(reason.as_str()),
            _ => None,
        }
    }
}

/// A panic caught while running plugin or factory code, kept as an error
/// source.
#[derive(Debug, thiserror::Error)]
#[error("panic: {message}")]
pub struct PanicError {
    pub message: String,
}

impl PanicError {
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "<non-string panic payload>".to_string()
        };
        Self { message }
    }
}
