//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use fleet_sync::output::OutputConfig;

use crate::commands;

/// Fleet Sync - Keep a fleet of repositories in sync with shared templates
#[derive(Parser, Debug)]
#[command(name = "fleet-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sync every managed module with the central template tree
    Sync(commands::sync::SyncArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.log_level.as_str()),
        )
        .init();
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Sync(args) => commands::sync::execute(args, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
