//! # Gantry Core Configuration
//!
//! Property storage consumed by the plugin manager.
//!
//! The manager only talks to configuration through the [`Configuration`]
//! trait; [`Properties`] is the in-memory implementation shipped with the
//! runtime, loadable from JSON, TOML or YAML files ([`ConfigFormat`]).
use std::collections::HashMap;

pub mod error;
pub mod format;
pub mod properties;

pub use error::ConfigError;
pub use format::ConfigFormat;
pub use properties::Properties;

/// Configuration interface the plugin manager depends on
pub trait Configuration: Send + Sync {
    /// Value of a single property
    fn property(&self, key: &str) -> Option<String>;

    /// Set a property; an empty value removes it
    fn set_property(&self, key: &str, value: &str);

    /// Every entry whose key starts with `prefix`, keyed by full property name
    fn entries_for_prefix(&self, prefix: &str) -> HashMap<String, String>;

    /// Property split into a list on commas and whitespace
    fn list_property(&self, key: &str) -> Vec<String>;

    /// Integer property, or `default` when absent or unparsable
    fn int_property_with_default(&self, key: &str, default: i64) -> i64;

    /// Convert `--<prefix>.key[=value]` arguments into properties and return
    /// the arguments that were not consumed, in order.
    fn parse_command_line_options(&self, prefix: &str, args: Vec<String>) -> Vec<String>;
}
