//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bouncer - inspect failure kinds, preview messages and check configuration
#[derive(Parser, Debug)]
#[command(name = "bouncer")]
#[command(about = "Inspect failure kinds, preview messages and check dispatcher configuration", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every failure kind with its inverse
    Kinds,

    /// Preview the stock message for a failure kind
    Render {
        /// Failure kind name, e.g. NotInChannel
        kind: String,

        /// Positional arguments, e.g. channel ids or seconds
        #[arg(long = "arg")]
        args: Vec<String>,
    },

    /// Print the effective dispatcher configuration
    Config {
        /// Read this file on top of the bundled defaults instead of the usual locations
        #[arg(long)]
        path: Option<PathBuf>,
    },
}
