//! # hire-cli: CLI Tool for the Hiring Ledger
//!
//! Provides the `hire` command-line interface for operators.
//!
//! ## Subcommands
//!
//! - `hire config check`: parse and validate a ledger configuration.
//! - `hire journal verify`: check a journal's digest chain.
//! - `hire journal replay`: rebuild the ledger from a journal and report it.
//! - `hire demo`: run a scripted end-to-end scenario, optionally journaled.
//!
//! ```bash
//! hire config check ledger.yaml
//! hire journal verify ledger.jsonl
//! hire journal replay ledger.jsonl --json
//! hire demo --journal /tmp/demo.jsonl
//! ```
//!
//! Handlers return an exit code: 0 on success, 1 when a check fails.
//! Operational errors propagate as `anyhow::Error`.

pub mod config;
pub mod demo;
pub mod journal;
