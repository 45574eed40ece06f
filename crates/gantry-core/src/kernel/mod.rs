//! # Gantry Core Kernel
//!
//! Shared runtime pieces the plugin system is built on.
//!
//! ## Key Components:
//!
//! - **Context**: [`PluginContext`](context::PluginContext), the opaque handle
//!   handed to every plugin factory.
//! - **Logger**: the [`Logger`](logger::Logger) trait a `Logger` plugin provides.
//! - **Core Constants**: configuration key names and platform tags in `constants`.
//! - **Error Handling**: the crate-level [`Error`](error::Error) and `Result` alias.
pub mod constants;
pub mod context;
pub mod error;
pub mod logger;

pub use context::PluginContext;
pub use error::{BoxError, Error, Result};
pub use logger::Logger;
