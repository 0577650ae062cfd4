//! # hire-ledger: Job and Certificate Ledgers
//!
//! The authoritative state of the hiring platform. Two registries share
//! one administrator and one commit discipline:
//!
//! - [`JobLedger`]: users, jobs and applications with per-user,
//!   per-job, per-category and active-job indices.
//! - [`CertificateLedger`]: soulbound certificates with holder and type
//!   indices.
//!
//! Every mutating operation validates fully before its first write, so a
//! rejected call leaves the ledger untouched. Mutations are expressed as
//! [`Transaction`] values and executed by [`Ledger`]; [`LedgerService`]
//! serializes them behind a lock, appends them to a [`Journal`], logs the
//! resulting [`LedgerEvent`]s and counts outcomes.
//!
//! ## Crate Policy
//!
//! - No I/O outside `journal.rs` and `config.rs`.
//! - Time comes from the caller's [`CallContext`], never from the system.

pub mod access;
pub mod certificates;
pub mod config;
pub mod events;
pub mod index;
pub mod jobs;
pub mod journal;
pub mod relay;
pub mod service;
pub mod tx;

pub use access::{Authority, CallContext};
pub use certificates::{
    Certificate, CertificateBatch, CertificateDetails, CertificateLedger, CertificateVerification,
    DetailedVerification,
};
pub use config::{CertificateCollectionConfig, ConfigError, LedgerConfig};
pub use events::LedgerEvent;
pub use index::Index;
pub use jobs::{Application, CompleteApplication, CompleteJob, Job, JobLedger, LedgerStats, User};
pub use journal::{
    replay, replay_records, verify, Journal, JournalEntry, JournalError, JournalRecord, ReplaySummary,
};
pub use relay::{ProofSubmission, ProofVerifier, RelayError, VerificationError, VerificationRelay};
pub use service::{LedgerService, Receipt, ServiceError};
pub use tx::{Ledger, Outcome, Transaction};
