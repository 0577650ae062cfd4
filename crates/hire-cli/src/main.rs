//! # hire CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hire_cli::config::{run_config, ConfigArgs};
use hire_cli::demo::{run_demo, DemoArgs};
use hire_cli::journal::{run_journal, JournalArgs};

/// Hiring ledger operator toolchain.
///
/// Validates ledger configurations, verifies and replays journals, and
/// runs a scripted demo scenario.
#[derive(Parser, Debug)]
#[command(name = "hire", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ledger configuration checks.
    Config(ConfigArgs),

    /// Journal verification and replay.
    Journal(JournalArgs),

    /// Run the scripted end-to-end scenario.
    Demo(DemoArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    let result = match cli.command {
        Commands::Config(args) => run_config(&args),
        Commands::Journal(args) => run_journal(&args),
        Commands::Demo(args) => run_demo(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
