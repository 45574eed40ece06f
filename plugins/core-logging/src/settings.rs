use std::str::FromStr;

use gantry_core::Configuration;
use gantry_core::kernel::constants::LOG_ENV_VAR;
use tracing_subscriber::EnvFilter;

/// Property holding the default filter directive, e.g. `info,gantry_core=debug`
pub const LEVEL_PROPERTY: &str = "Logger.Level";
/// Property selecting the output format: `full`, `compact` or `json`
pub const FORMAT_PROPERTY: &str = "Logger.Format";
/// Property that disables ANSI colors when set to `0`
pub const ANSI_PROPERTY: &str = "Logger.Ansi";

const DEFAULT_DIRECTIVE: &str = "info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "pretty" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{}'", other)),
        }
    }
}

/// How the tracing subscriber is set up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Directive used when the environment variable is not set
    pub directive: String,
    pub format: LogFormat,
    pub ansi: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            directive: DEFAULT_DIRECTIVE.to_string(),
            format: LogFormat::default(),
            ansi: true,
        }
    }
}

impl LogSettings {
    /// Read settings from the runtime configuration. A first plugin argument
    /// overrides `Logger.Level`.
    pub fn from_configuration(config: &dyn Configuration, args: &[String]) -> Result<Self, String> {
        let mut settings = Self::default();
        if let Some(level) = args.first().cloned().or_else(|| config.property(LEVEL_PROPERTY)) {
            settings.directive = level;
        }
        if let Some(format) = config.property(FORMAT_PROPERTY) {
            settings.format = format.parse()?;
        }
        settings.ansi = config.int_property_with_default(ANSI_PROPERTY, 1) > 0;
        Ok(settings)
    }

    /// Filter from `GANTRY_LOG`, falling back to the configured directive
    pub fn env_filter(&self) -> Result<EnvFilter, String> {
        match std::env::var(LOG_ENV_VAR) {
            Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive)
                .map_err(|e| format!("invalid {} value: {}", LOG_ENV_VAR, e)),
            _ => EnvFilter::try_new(&self.directive).map_err(|e| {
                format!("invalid {} value `{}': {}", LEVEL_PROPERTY, self.directive, e)
            }),
        }
    }
}
