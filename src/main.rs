//! # fleet-sync CLI
//!
//! Binary entry point for the `fleet-sync` command-line tool. Parses
//! arguments with `clap` and dispatches to the matching command. The core
//! logic lives in the `fleet_sync` library crate; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
