use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Gantry: a configuration-driven plugin runtime
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Configuration file (JSON, TOML or YAML)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the configured plugins and list them in init order
    List(RuntimeArgs),
    /// Load and initialize the configured plugins, then tear them down
    Run(RuntimeArgs),
}

impl Commands {
    pub fn runtime_args(&self) -> &RuntimeArgs {
        match self {
            Commands::List(args) | Commands::Run(args) => args,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct RuntimeArgs {
    /// Property overrides and plugin options after `--`, e.g.
    /// `--Plugin.Logger=core-logging --InitPlugins=0 --Logger.Format=json`
    #[arg(last = true, value_name = "OVERRIDES")]
    pub overrides: Vec<String>,
}
