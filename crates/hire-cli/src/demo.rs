//! # Demo Subcommand
//!
//! Runs a fixed hiring scenario against a fresh ledger on a manual clock:
//! verifier setup, registration, a job posting with one application and
//! review, relayed identity verification, certificate issuance and
//! revocation, and two operations the ledger must refuse. With
//! `--journal` the run is persisted and can be checked afterwards with
//! `hire journal verify` and `hire journal replay`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use hire_core::{Address, ApplicationId, JobId, ManualClock, Timestamp, TokenId, UserRole};
use hire_ledger::{
    LedgerConfig, LedgerService, LedgerStats, ProofSubmission, ProofVerifier, Receipt, RelayError, ServiceError,
    Transaction, VerificationError, VerificationRelay,
};

/// Clock start of every demo run.
pub const DEMO_START: &str = "2026-01-05T09:00:00Z";

/// Arguments for the `hire demo` subcommand.
#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Journal the run to this file. Must not exist yet.
    #[arg(long)]
    pub journal: Option<PathBuf>,
}

/// Accepts proofs whose user context data names the proven address.
#[derive(Debug, Default)]
pub struct DemoVerifier;

impl ProofVerifier for DemoVerifier {
    fn verify(&self, submission: &ProofSubmission) -> Result<Address, VerificationError> {
        submission
            .user_context_data
            .parse()
            .map_err(|e| VerificationError::Rejected(format!("user context is not an address: {e}")))
    }
}

/// What a scripted run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoReport {
    pub committed: usize,
    /// Codes of the refused steps, in order.
    pub rejected: Vec<&'static str>,
    pub jobs: LedgerStats,
    pub certificates_issued: u64,
}

pub fn demo_admin() -> Address {
    Address::derive("demo-admin")
}

pub fn demo_relay() -> Address {
    Address::derive("demo-relay")
}

/// Execute the demo subcommand.
pub fn run_demo(args: &DemoArgs) -> Result<u8> {
    if let Some(path) = &args.journal {
        if path.exists() {
            bail!("refusing to reuse existing journal {}", path.display());
        }
    }
    let mut config = LedgerConfig::with_admin(demo_admin());
    config.journal_path = args.journal.clone();
    let clock = Arc::new(ManualClock::starting_at(Timestamp::parse(DEMO_START)?));
    let service = LedgerService::open(&config, clock.clone())?;

    let mut stdout = std::io::stdout().lock();
    let report = run_script(&service, &clock, &mut stdout)?;
    writeln!(stdout, "{}", serde_json::to_string_pretty(&report)?)?;
    Ok(0)
}

struct Runner<'a> {
    service: &'a LedgerService,
    out: &'a mut dyn Write,
    committed: usize,
    rejected: Vec<&'static str>,
}

impl Runner<'_> {
    fn step(&mut self, label: &str, caller: Address, tx: Transaction) -> Result<Option<Receipt>> {
        match self.service.submit(caller, tx) {
            Ok(receipt) => {
                self.committed(label, &receipt)?;
                Ok(Some(receipt))
            }
            Err(ServiceError::Ledger(e)) => {
                self.refused(label, e.code(), &e)?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn relay(&mut self, label: &str, relay: &VerificationRelay<DemoVerifier>, proof: &ProofSubmission) -> Result<()> {
        match relay.relay(self.service, proof) {
            Ok(receipt) => self.committed(label, &receipt),
            Err(RelayError::Verification(e)) => self.refused(label, "PROOF_REJECTED", &e),
            Err(RelayError::Service(ServiceError::Ledger(e))) => self.refused(label, e.code(), &e),
            Err(RelayError::Service(e)) => Err(e.into()),
        }
    }

    fn committed(&mut self, label: &str, receipt: &Receipt) -> Result<()> {
        let events: Vec<&str> = receipt.events.iter().map(|e| e.name()).collect();
        writeln!(self.out, "ok        {label:<34} {}", events.join(","))?;
        self.committed += 1;
        Ok(())
    }

    fn refused(&mut self, label: &str, code: &'static str, err: &dyn std::fmt::Display) -> Result<()> {
        writeln!(self.out, "rejected  {label:<34} {code}: {err}")?;
        self.rejected.push(code);
        Ok(())
    }
}

/// Drive the scenario against `service`, writing one line per step.
pub fn run_script(service: &LedgerService, clock: &ManualClock, out: &mut dyn Write) -> Result<DemoReport> {
    let admin = demo_admin();
    let relay_addr = demo_relay();
    let alice = Address::derive("demo-alice");
    let bob = Address::derive("demo-bob");
    let mut run = Runner {
        service,
        out,
        committed: 0,
        rejected: Vec::new(),
    };

    run.step("designate verifier", admin, Transaction::SetBackendAddress { address: relay_addr })?;
    run.step(
        "register alice (job seeker)",
        alice,
        Transaction::RegisterUser {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            role: UserRole::JobSeeker,
        },
    )?;
    run.step(
        "register bob (employer)",
        bob,
        Transaction::RegisterUser {
            name: "Bob".into(),
            email: "bob@example.com".into(),
            role: UserRole::Employer,
        },
    )?;
    run.step(
        "post job",
        bob,
        Transaction::PostJob {
            title: "Backend Engineer".into(),
            description: "Build the hiring ledger".into(),
            deadline: clock.now().plus_secs(7 * 86_400),
        },
    )?;
    run.step(
        "categorize job",
        bob,
        Transaction::SetJobDetails {
            job_id: JobId(1),
            category: "Engineering".into(),
            location: "Remote".into(),
            salary_range: "120k-150k".into(),
        },
    )?;

    clock.advance(3_600);
    run.step("alice applies", alice, Transaction::ApplyForJob { job_id: JobId(1) })?;
    run.step(
        "alice attaches resume",
        alice,
        Transaction::SetApplicationDetails {
            application_id: ApplicationId(1),
            cover_letter: "I would like to build this.".into(),
            resume_hash: "QmResumeAlice".into(),
        },
    )?;
    run.step(
        "bob reviews",
        bob,
        Transaction::MarkApplicationReviewed {
            application_id: ApplicationId(1),
        },
    )?;

    let relay = VerificationRelay::new(DemoVerifier, relay_addr);
    let proof = ProofSubmission {
        user: alice,
        attestation_id: 1,
        proof: serde_json::json!({ "scheme": "demo" }),
        public_signals: vec!["1".into()],
        user_context_data: alice.to_string(),
    };
    run.relay("relay verifies alice", &relay, &proof)?;

    clock.advance(86_400);
    run.step(
        "issue diploma to alice",
        admin,
        Transaction::MintCertificate {
            recipient: alice,
            metadata_uri: "ipfs://demo/diploma".into(),
            certificate_type: "Diploma".into(),
            subject_name: "Alice".into(),
            course_name: "Distributed Systems".into(),
            grade: "A".into(),
        },
    )?;
    run.step(
        "issue badges",
        admin,
        Transaction::BatchMintCertificatesSimple {
            recipients: vec![alice, bob],
            metadata_uris: vec!["ipfs://demo/badge-1".into(), "ipfs://demo/badge-2".into()],
            certificate_type: "Badge".into(),
        },
    )?;
    run.step("revoke bob's badge", admin, Transaction::RevokeCertificate { token_id: TokenId(3) })?;

    run.step(
        "alice tries to transfer diploma",
        alice,
        Transaction::TransferFrom {
            from: alice,
            to: bob,
            token_id: TokenId(1),
        },
    )?;
    run.step("bob applies to own job", bob, Transaction::ApplyForJob { job_id: JobId(1) })?;

    let (jobs, certificates_issued) = service.read(|l| (l.jobs.get_contract_stats(), l.certificates.total_supply()));
    Ok(DemoReport {
        committed: run.committed,
        rejected: run.rejected,
        jobs,
        certificates_issued,
    })
}
