//! droprelay CLI - relay files dropped into local folders to an SFTP server
//!
//! Usage: droprelay <COMMAND>
//!
//! Commands:
//!   run    Watch the configured folders and upload settled files
//!   check  Validate the configuration without connecting

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config } => commands::run::cmd_run(config.as_deref(), cli.verbose),
        Commands::Check { config, json } => commands::check::cmd_check(config.as_deref(), json),
    }
}
