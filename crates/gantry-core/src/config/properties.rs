use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use log::debug;

use crate::config::Configuration;
use crate::config::error::ConfigError;
use crate::config::format::ConfigFormat;
use crate::kernel::constants::{INIT_PLUGINS_PROPERTY, PLUGIN_LOAD_ORDER_PROPERTY, PLUGIN_PREFIX};

/// Thread-safe key/value property store.
///
/// Keys are kept sorted so prefix scans are deterministic.
#[derive(Debug, Default)]
pub struct Properties {
    values: RwLock<BTreeMap<String, String>>,
}

impl Properties {
    /// Create an empty property set
    pub fn new() -> Self {
        Self::default()
    }

    /// Load properties from a JSON, TOML or YAML file, chosen by extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedConfigFormat(path.display().to_string()))?;
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            operation: "read".to_string(),
            source,
        })?;
        Self::parse_str(&data, format)
    }

    /// Parse properties from an in-memory document
    pub fn parse_str(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let values = format.parse_properties(data)?;
        debug!("Parsed {} properties from {} document", values.len(), format.extension());
        Ok(Self {
            values: RwLock::new(values),
        })
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<String> {
        self.read().get(key).cloned()
    }

    /// Set a property value. An empty value removes the property.
    pub fn set_property(&self, key: &str, value: &str) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        if value.is_empty() {
            values.remove(key);
        } else {
            values.insert(key.to_string(), value.to_string());
        }
    }

    /// Number of properties set
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// True when no property is set
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Consume runtime overrides from a command line: `--Plugin.*`,
    /// `--PluginLoadOrder=..` and `--InitPlugins=..`. Returns the remaining
    /// arguments in order.
    pub fn parse_runtime_command_line_options(&self, args: Vec<String>) -> Vec<String> {
        let plugin_prefix = PLUGIN_PREFIX.trim_end_matches('.');
        let args = self.parse_command_line_options(plugin_prefix, args);

        let mut remaining = Vec::with_capacity(args.len());
        for arg in args {
            let is_runtime_key = [PLUGIN_LOAD_ORDER_PROPERTY, INIT_PLUGINS_PROPERTY]
                .iter()
                .any(|key| option_key(&arg).is_some_and(|k| k == *key));
            if is_runtime_key {
                self.apply_option(&arg);
            } else {
                remaining.push(arg);
            }
        }
        remaining
    }

    fn apply_option(&self, arg: &str) {
        let line = arg.trim_start_matches("--");
        let (key, value) = match line.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (line.trim(), "1"),
        };
        debug!("Setting property '{}' from command line", key);
        self.set_property(key, value);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let properties = Properties::new();
        for (key, value) in iter {
            properties.set_property(&key.into(), &value.into());
        }
        properties
    }
}

/// Key of a `--key[=value]` option
fn option_key(arg: &str) -> Option<&str> {
    let line = arg.strip_prefix("--")?;
    Some(line.split_once('=').map_or(line, |(key, _)| key).trim())
}

impl Configuration for Properties {
    fn property(&self, key: &str) -> Option<String> {
        self.get_property(key)
    }

    fn set_property(&self, key: &str, value: &str) {
        Properties::set_property(self, key, value);
    }

    fn entries_for_prefix(&self, prefix: &str) -> HashMap<String, String> {
        self.read()
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn list_property(&self, key: &str) -> Vec<String> {
        self.get_property(key)
            .map(|value| {
                value
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn int_property_with_default(&self, key: &str, default: i64) -> i64 {
        self.get_property(key)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_command_line_options(&self, prefix: &str, args: Vec<String>) -> Vec<String> {
        let option_prefix = format!("--{}.", prefix);
        let mut remaining = Vec::with_capacity(args.len());
        for arg in args {
            if arg.starts_with(&option_prefix) {
                self.apply_option(&arg);
            } else {
                remaining.push(arg);
            }
        }
        remaining
    }
}
