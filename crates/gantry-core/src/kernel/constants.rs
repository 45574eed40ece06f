/// Application name
pub const APP_NAME: &str = "Gantry";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix shared by every plugin configuration key (`Plugin.<name>[.<tag>]`)
pub const PLUGIN_PREFIX: &str = "Plugin.";

/// Property listing plugins that must be loaded first, in order
pub const PLUGIN_LOAD_ORDER_PROPERTY: &str = "PluginLoadOrder";

/// Property controlling whether `load_plugins` initializes the plugins it loaded
pub const INIT_PLUGINS_PROPERTY: &str = "InitPlugins";

/// Platform tag selecting plugin entries meant for this runtime
pub const PLATFORM_TAG: &str = "rust";

/// Platform tags of other runtimes sharing the same configuration.
/// Entries carrying one of these are ignored.
pub const FOREIGN_PLATFORM_TAGS: &[&str] = &[
    "cpp", "clr", "java", "py", "js", "rb", "php", "swift", "matlab",
];

/// Plugin name whose instance must provide the runtime logger
pub const LOGGER_PLUGIN_NAME: &str = "Logger";

/// Object kind reported by registry errors
pub const PLUGIN_KIND: &str = "plugin";

/// Environment variable read by the logging plugin for its filter
pub const LOG_ENV_VAR: &str = "GANTRY_LOG";
