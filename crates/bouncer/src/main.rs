//! Bouncer CLI binary.
//!
//! This binary helps when writing formatters and configuration:
//! - List the failure taxonomy with each kind's inverse
//! - Preview the stock message for a failure kind
//! - Print the effective dispatcher configuration

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, list_kinds, render_kind, show_config};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        bouncer::init_tracing_with("debug")?;
    } else {
        bouncer::init_tracing()?;
    }

    // Execute the requested command
    match cli.command {
        Commands::Kinds => {
            for line in list_kinds() {
                println!("{line}");
            }
        }

        Commands::Render { kind, args } => {
            println!("{}", render_kind(&kind, &args)?);
        }

        Commands::Config { path } => {
            print!("{}", show_config(path.as_deref())?);
        }
    }

    Ok(())
}
