use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;
#[cfg(feature = "yaml-config")]
use serde_yaml;
#[cfg(feature = "toml-config")]
use toml;

use crate::config::error::ConfigError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    /// Parse a document into flat `key -> value` properties.
    ///
    /// Nested tables become dotted keys (`[Plugin] Logger = ".."` yields
    /// `Plugin.Logger`), arrays are joined with commas and scalars are
    /// stringified.
    pub fn parse_properties(&self, data: &str) -> Result<BTreeMap<String, String>, ConfigError> {
        let root: Value = match self {
            ConfigFormat::Json => {
                serde_json::from_str(data).map_err(|e| deserialization_error(self, e))?
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::from_str(data).map_err(|e| deserialization_error(self, e))?
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| deserialization_error(self, e))?,
        };

        let Value::Object(table) = root else {
            return Err(ConfigError::InvalidRoot(self.extension().to_string()));
        };

        let mut out = BTreeMap::new();
        for (key, value) in table {
            flatten_into(&mut out, key, value);
        }
        Ok(out)
    }
}

fn deserialization_error<E>(format: &ConfigFormat, source: E) -> ConfigError
where
    E: std::error::Error + Send + Sync + 'static,
{
    ConfigError::DeserializationError {
        format: format.extension().to_string(),
        source: Box::new(source),
    }
}

fn flatten_into(out: &mut BTreeMap<String, String>, key: String, value: Value) {
    match value {
        Value::Object(table) => {
            for (child, value) in table {
                flatten_into(out, format!("{}.{}", key, child), value);
            }
        }
        Value::Array(items) => {
            let joined = items
                .into_iter()
                .map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(key, joined);
        }
        other => {
            out.insert(key, scalar_to_string(other));
        }
    }
}

fn scalar_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
