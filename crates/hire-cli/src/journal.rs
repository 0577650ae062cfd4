//! # Journal Subcommand
//!
//! Offline checks on a ledger journal. `verify` walks the digest chain
//! without executing anything. `replay` re-executes every transaction as
//! its recorded caller at its recorded time and reports the state reached.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use hire_core::ContentDigest;
use hire_ledger::{journal, JournalError, LedgerStats};

/// Arguments for the `hire journal` subcommand.
#[derive(Args, Debug)]
pub struct JournalArgs {
    #[command(subcommand)]
    pub command: JournalCommand,
}

#[derive(Subcommand, Debug)]
pub enum JournalCommand {
    /// Check sequence numbers and the digest chain.
    Verify {
        #[arg(value_name = "JOURNAL")]
        path: PathBuf,
    },
    /// Rebuild the ledger from the journal and print a summary.
    Replay {
        #[arg(value_name = "JOURNAL")]
        path: PathBuf,
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// State reached by a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub records: u64,
    pub transactions: u64,
    pub by_op: BTreeMap<String, u64>,
    pub head: ContentDigest,
    pub jobs: LedgerStats,
    pub certificates_issued: u64,
}

/// Execute the journal subcommand.
pub fn run_journal(args: &JournalArgs) -> Result<u8> {
    match &args.command {
        JournalCommand::Verify { path } => verify(path),
        JournalCommand::Replay { path, json } => replay(path, *json),
    }
}

fn verify(path: &Path) -> Result<u8> {
    match journal::verify(path) {
        Ok(records) => {
            let head = records.last().map(|r| r.digest).unwrap_or_else(ContentDigest::zero);
            println!("OK {} ({} records, head {head})", path.display(), records.len());
            Ok(0)
        }
        Err(e @ JournalError::Io(_)) => Err(e.into()),
        Err(e) => {
            println!("FAILED {}: {e}", path.display());
            Ok(1)
        }
    }
}

/// Replay `path` into a report.
pub fn replay_report(path: &Path) -> Result<ReplayReport, JournalError> {
    let (ledger, summary) = journal::replay(path)?;
    Ok(ReplayReport {
        records: summary.records,
        transactions: summary.transactions,
        by_op: summary.by_op,
        head: summary.head,
        jobs: ledger.jobs.get_contract_stats(),
        certificates_issued: ledger.certificates.total_supply(),
    })
}

fn replay(path: &Path, json: bool) -> Result<u8> {
    let report = match replay_report(path) {
        Ok(report) => report,
        Err(e @ JournalError::Io(_)) => return Err(e.into()),
        Err(e) => {
            println!("FAILED {}: {e}", path.display());
            return Ok(1);
        }
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(0);
    }
    println!("replayed {} transactions ({} records)", report.transactions, report.records);
    for (op, count) in &report.by_op {
        println!("  {op:<32} {count}");
    }
    println!(
        "jobs: {} total, {} active; applications: {}",
        report.jobs.total_jobs, report.jobs.active_jobs, report.jobs.total_applications
    );
    println!("certificates issued: {}", report.certificates_issued);
    println!("head: {}", report.head);
    Ok(0)
}
