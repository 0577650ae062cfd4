//! # Config Subcommand
//!
//! Loads a ledger configuration the same way the API server does and
//! prints the effective settings, defaults filled in.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use hire_ledger::LedgerConfig;

/// Arguments for the `hire config` subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Parse and validate a ledger configuration file.
    Check {
        /// Path to the YAML configuration.
        #[arg(value_name = "CONFIG_YAML")]
        path: PathBuf,
    },
}

/// Execute the config subcommand.
pub fn run_config(args: &ConfigArgs) -> Result<u8> {
    match &args.command {
        ConfigCommand::Check { path } => match LedgerConfig::from_yaml_file(path) {
            Ok(config) => {
                println!("OK {}", path.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(0)
            }
            Err(e) => {
                println!("FAILED {}: {e}", path.display());
                Ok(1)
            }
        },
    }
}
