use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// droprelay - relay files dropped into local folders to an SFTP server
#[derive(Parser, Debug)]
#[command(name = "droprelay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the configured folders and upload settled files until Ctrl+C
    Run {
        /// Configuration file (default: $DROPRELAY_CONFIG, ./droprelay.toml, user config)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate the configuration and folder mappings without connecting
    Check {
        /// Configuration file (default: $DROPRELAY_CONFIG, ./droprelay.toml, user config)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}
