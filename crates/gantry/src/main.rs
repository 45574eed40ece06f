mod cli; // Declare the cli module

use std::error::Error as StdError;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use gantry_core::config::{ConfigError, ConfigFormat};
use gantry_core::kernel::constants::{APP_NAME, APP_VERSION};
use gantry_core::{Configuration, Error, PluginContext, PluginManager, Properties, Result};
use log::{error, info};

use cli::{CliArgs, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    // --- Statically Register Core Plugin Factories ---
    core_logging::register()?;

    let properties = Arc::new(load_properties(args.config.as_deref()).await?);
    let overrides = args.command.runtime_args().overrides.clone();
    let mut cmd_args = properties.parse_runtime_command_line_options(overrides);

    let configuration: Arc<dyn Configuration> = properties.clone();
    let manager = PluginManager::new(PluginContext::new(APP_NAME, configuration));
    manager.load_plugins(&mut cmd_args)?;

    match args.command {
        Commands::List(_) => {
            let names = manager.plugin_names();
            if names.is_empty() {
                println!("No plugins configured.");
            } else {
                println!("Loaded {} plugin(s):", names.len());
                for (position, name) in names.iter().enumerate() {
                    println!("  {}. {}", position + 1, name);
                }
            }
            let logger = if manager.logger().is_some() { "installed" } else { "none" };
            println!("Logger: {}", logger);
        }
        Commands::Run(_) => {
            if !manager.is_initialized() {
                manager.initialize_plugins()?;
            }
            if let Some(logger) = manager.logger() {
                logger.print(&format!("{} {} runtime started", APP_NAME, APP_VERSION));
            }
            info!("Runtime started with plugins {:?}", manager.plugin_names());
            println!("Initialized {} plugin(s)", manager.plugin_names().len());
            if !cmd_args.is_empty() {
                println!("Unconsumed arguments: {}", cmd_args.join(" "));
            }
        }
    }

    let report = manager.destroy();
    for failure in &report.failures {
        eprintln!("Warning: plugin '{}' failed to shut down: {}", failure.plugin, failure.message);
    }
    println!("Destroyed {} plugin(s)", report.destroyed);
    Ok(())
}

/// Read the configuration file, or start from an empty property set
async fn load_properties(path: Option<&Path>) -> Result<Properties> {
    let Some(path) = path else {
        return Ok(Properties::new());
    };

    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedConfigFormat(path.display().to_string()))?;
    let data = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(e, "read", path.to_path_buf()))?;
    Ok(Properties::parse_str(&data, format)?)
}

fn report_error(e: &Error) {
    error!("{}", e);
    eprintln!("Error: {}", e);

    // The wrapped error is already part of the message above.
    let mut source = match e {
        Error::PluginSystem(inner) => inner.source(),
        Error::Config(inner) => inner.source(),
        Error::Other(_) => None,
    };
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}
