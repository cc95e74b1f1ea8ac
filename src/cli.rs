//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use checkin::output::OutputMode;

/// checkin - Scan badges, check people in once a day
#[derive(Parser, Debug)]
#[command(
    name = "checkin",
    version,
    about = "Scan badges, check people in once a day",
    long_about = "Record check-ins from decoded QR codes and barcodes.\n\n\
                  Each identity is checked in at most once per calendar day.\n\
                  New check-ins are posted to the configured webhook."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file (defaults to ~/.checkin/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read decoded codes from stdin, one frame per line, and check them in
    ///
    /// An empty line means no code is in view. A code held in view across
    /// several lines counts once. A line reading `!reset` starts the session over.
    Scan,

    /// Check in a single identity
    Add {
        /// Identity decoded from the code (omit to report an unreadable code)
        identity: Option<String>,
    },

    /// Clear today's check-ins
    Reset,

    /// Show who is checked in today
    Status,

    /// Show version
    Version,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let config = cli.config.as_deref();

    match cli.command {
        Some(Command::Scan) => commands::scan(config, output_mode),
        Some(Command::Add { identity }) => commands::add(identity.as_deref(), config, output_mode),
        Some(Command::Reset) => commands::reset(config, output_mode),
        Some(Command::Status) => commands::status(config, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("checkin v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("checkin v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'checkin --help' for usage");
                println!("Run 'checkin scan' to start checking people in");
            }
            Ok(())
        },
    }
}
