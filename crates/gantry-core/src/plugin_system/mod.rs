//! # Gantry Core Plugin System
//!
//! This module discovers, orders, instantiates, initializes and tears down
//! the plugins of a Gantry runtime.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`resolver`]**: Turns `Plugin.<name>[.<tag>]` configuration entries and the
//!   `PluginLoadOrder` list into an ordered list of [`PluginSpec`]s.
//! - **[`factory`]**: The table of named factory constructors ([`FactoryRegistry`])
//!   that factory locators are resolved against.
//! - **[`dylib`]**: Resolves `<library>:<symbol>` locators by loading a shared library.
//! - **[`instantiator`]**: Creates a plugin from a [`PluginSpec`] through its factory and
//!   reports every failure as a plugin initialization error.
//! - **[`registry`]**: Keeps plugins by name and in registration order ([`PluginRegistry`]).
//! - **[`lifecycle`]**: Initialize-all-or-roll-back over the registry.
//! - **[`manager`]**: The [`PluginManager`], which drives all of the above under one lock.
//! - **[`traits`]**: The [`Plugin`], [`LoggerPlugin`] and [`PluginFactory`] traits.
//! - **[`error`]**: [`PluginSystemError`](error::PluginSystemError).
pub mod dylib;
pub mod error;
pub mod factory;
pub mod instantiator;
pub(crate) mod lifecycle;
pub mod manager;
pub mod registry;
pub mod resolver;
pub mod traits;

pub use error::PluginSystemError;
pub use factory::{FactoryRegistry, global_factories, register_factory};
pub use manager::PluginManager;
pub use registry::{PluginRegistry, TeardownFailure, TeardownReport};
pub use resolver::{PluginSpec, SpecResolver};
pub use traits::{LoggerPlugin, Plugin, PluginFactory};

// Test module declaration
#[cfg(test)]
mod tests;
