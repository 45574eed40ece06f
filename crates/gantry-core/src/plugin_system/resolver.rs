//! Turns `Plugin.*` configuration entries into an ordered list of
//! [`PluginSpec`]s.
//!
//! Plugins named in the load-order list come first, in list order. Every
//! other entry follows in key order. For each name the entry tagged with this
//! runtime's platform tag wins over the untagged one; entries tagged for
//! another runtime are dropped.
use std::collections::{BTreeMap, HashMap, HashSet};

use log::debug;

use crate::config::Configuration;
use crate::kernel::constants::{
    FOREIGN_PLATFORM_TAGS, PLATFORM_TAG, PLUGIN_LOAD_ORDER_PROPERTY, PLUGIN_PREFIX,
};
use crate::plugin_system::error::PluginSystemError;

/// A plugin to instantiate: its name, the factory locator and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginSpec {
    pub name: String,
    pub factory_locator: String,
    pub args: Vec<String>,
}

impl PluginSpec {
    /// Parse a raw entry of the form `<factory-locator> [arg ...]`
    pub fn parse(name: &str, value: &str) -> Result<Self, PluginSystemError> {
        let value = value.trim();
        let (locator, rest) = match value.find(char::is_whitespace) {
            Some(pos) => (&value[..pos], &value[pos..]),
            None => (value, ""),
        };

        if locator.is_empty() {
            return Err(PluginSystemError::plugin_initialization(format!(
                "plugin `{}' has no factory locator",
                name
            )));
        }

        Ok(Self {
            name: name.to_string(),
            factory_locator: locator.to_string(),
            args: rest.split_whitespace().map(str::to_string).collect(),
        })
    }
}

/// Resolves raw configuration entries into load order
#[derive(Debug, Clone)]
pub struct SpecResolver {
    prefix: String,
    platform_tag: String,
    foreign_tags: Vec<String>,
}

impl Default for SpecResolver {
    fn default() -> Self {
        Self::new(PLUGIN_PREFIX, PLATFORM_TAG, FOREIGN_PLATFORM_TAGS)
    }
}

impl SpecResolver {
    pub fn new(prefix: &str, platform_tag: &str, foreign_tags: &[&str]) -> Self {
        Self {
            prefix: prefix.to_string(),
            platform_tag: platform_tag.to_string(),
            foreign_tags: foreign_tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Order `entries` into `(name, raw value)` pairs.
    ///
    /// `is_loaded` reports names already present in the registry; naming one
    /// of those (or the same name twice) in `load_order` is an error.
    pub fn resolve_entries(
        &self,
        entries: &HashMap<String, String>,
        load_order: &[String],
        is_loaded: impl Fn(&str) -> bool,
    ) -> Result<Vec<(String, String)>, PluginSystemError> {
        let snapshot: BTreeMap<&str, &str> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(&self.prefix))
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        let mut consumed: HashSet<String> = HashSet::new();
        let mut resolved_names: HashSet<String> = HashSet::new();
        let mut resolved = Vec::with_capacity(snapshot.len());

        for name in load_order {
            if resolved_names.contains(name) || is_loaded(name) {
                return Err(PluginSystemError::plugin_initialization(format!(
                    "plugin `{}' already loaded",
                    name
                )));
            }

            let tagged_key = self.tagged_key(name);
            let plain_key = self.plain_key(name);
            let available =
                |key: &String| !consumed.contains(key) && snapshot.contains_key(key.as_str());
            let chosen = if available(&tagged_key) {
                tagged_key.clone()
            } else if available(&plain_key) {
                plain_key.clone()
            } else {
                return Err(PluginSystemError::plugin_initialization(format!(
                    "plugin `{}' not defined",
                    name
                )));
            };

            debug!("Plugin '{}' resolved from load order using '{}'", name, chosen);
            resolved.push((name.clone(), snapshot[chosen.as_str()].to_string()));
            resolved_names.insert(name.clone());
            consumed.insert(tagged_key);
            consumed.insert(plain_key);
        }

        for (&key, &value) in &snapshot {
            if consumed.contains(key) {
                continue;
            }
            consumed.insert(key.to_string());

            let name = &key[self.prefix.len()..];
            let (name, value) = match name.rsplit_once('.') {
                Some((_, tag)) if self.foreign_tags.iter().any(|t| t == tag) => {
                    debug!("Ignoring plugin entry '{}' meant for another runtime", key);
                    continue;
                }
                Some((base, tag)) if tag == self.platform_tag => {
                    consumed.insert(self.plain_key(base));
                    (base, value)
                }
                _ => {
                    // Either no dot, or a dot that is part of the plugin name.
                    let tagged_key = self.tagged_key(name);
                    match snapshot.get(tagged_key.as_str()) {
                        Some(&tagged_value) if !consumed.contains(&tagged_key) => {
                            consumed.insert(tagged_key);
                            (name, tagged_value)
                        }
                        _ => (name, value),
                    }
                }
            };

            // Covers `Plugin.` as well as `Plugin..rust`.
            if name.is_empty() {
                return Err(PluginSystemError::plugin_initialization(format!(
                    "plugin entry `{}' has no name",
                    key
                )));
            }
            if resolved_names.contains(name) || is_loaded(name) {
                return Err(PluginSystemError::plugin_initialization(format!(
                    "plugin `{}' already loaded",
                    name
                )));
            }
            debug!("Plugin '{}' resolved from remaining entries", name);
            resolved_names.insert(name.to_string());
            resolved.push((name.to_string(), value.to_string()));
        }

        Ok(resolved)
    }

    /// Resolve the plugin specs defined in `config`.
    ///
    /// Each plugin's own `--<name>.key=value` options are moved out of its
    /// arguments and out of `cmd_args` into `config`.
    pub fn resolve(
        &self,
        config: &dyn Configuration,
        cmd_args: &mut Vec<String>,
        is_loaded: impl Fn(&str) -> bool,
    ) -> Result<Vec<PluginSpec>, PluginSystemError> {
        let entries = config.entries_for_prefix(&self.prefix);
        let load_order = config.list_property(PLUGIN_LOAD_ORDER_PROPERTY);

        let mut specs = Vec::new();
        for (name, value) in self.resolve_entries(&entries, &load_order, is_loaded)? {
            let mut spec = PluginSpec::parse(&name, &value)?;
            spec.args = config.parse_command_line_options(&spec.name, spec.args);
            *cmd_args = config.parse_command_line_options(&spec.name, std::mem::take(cmd_args));
            specs.push(spec);
        }
        Ok(specs)
    }

    fn plain_key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn tagged_key(&self, name: &str) -> String {
        format!("{}{}.{}", self.prefix, name, self.platform_tag)
    }
}
