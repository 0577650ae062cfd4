//! # Ledger Service
//!
//! The single writer. [`LedgerService::submit`] takes the writer lock,
//! stamps the transaction with the injected clock, executes it, appends it
//! to the journal, then logs and returns the events it produced.
//!
//! ## Snapshots
//!
//! Views never touch the writer's ledger. After each journaled commit the
//! writer publishes a fresh `Arc<Ledger>`; [`LedgerService::read`] clones
//! that `Arc` under a lock held only for the pointer copy and runs the
//! view against it. A slow view therefore never delays a writer, and a
//! journal `fsync` never delays a view. A view keeps seeing the snapshot
//! it started with even if commits land meanwhile.
//!
//! Both locks are `parking_lot`: non-poisoning, and never held across an
//! `.await` by any caller in this workspace.
//!
//! If the journal append fails after a commit, memory is ahead of disk.
//! That state is never published. The service halts: every later
//! `submit` fails with [`ServiceError::Halted`] until the process
//! restarts and replays.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use thiserror::Error;

use hire_core::{Address, Clock, LedgerError, Timestamp};

use crate::access::CallContext;
use crate::config::LedgerConfig;
use crate::events::LedgerEvent;
use crate::journal::{self, Journal, JournalError};
use crate::tx::{Ledger, Outcome, Transaction};

/// Errors from [`LedgerService`].
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The ledger rejected the transaction. Nothing changed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The journal could not be opened, replayed or appended to.
    #[error(transparent)]
    Journal(#[from] JournalError),

    /// A previous journal failure stopped the service accepting writes.
    #[error("ledger service halted after a journal failure")]
    Halted,
}

/// What a committed transaction produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub outcome: Outcome,
    pub events: Vec<LedgerEvent>,
    pub timestamp: Timestamp,
    /// Journal sequence number, when journaling is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seq: Option<u64>,
}

struct Writer {
    ledger: Ledger,
    journal: Option<Journal>,
}

/// Single-writer ledger with optional journaling and snapshot views.
pub struct LedgerService {
    writer: Mutex<Writer>,
    snapshot: RwLock<Arc<Ledger>>,
    halted: AtomicBool,
    journal_path: Option<PathBuf>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for LedgerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerService")
            .field("journal", &self.journal_path)
            .field("halted", &self.is_halted())
            .finish()
    }
}

impl LedgerService {
    /// In-memory service. Nothing is persisted.
    pub fn new(config: &LedgerConfig, clock: Arc<dyn Clock>) -> Self {
        Self::from_parts(Ledger::new(config), None, clock)
    }

    /// Service journaled to `config.journal_path`, if set.
    ///
    /// An existing journal is verified and replayed; its genesis config
    /// must equal `config`. A missing one is created.
    pub fn open(config: &LedgerConfig, clock: Arc<dyn Clock>) -> Result<Self, ServiceError> {
        let Some(path) = config.journal_path.as_deref() else {
            return Ok(Self::new(config, clock));
        };
        if path.exists() {
            let (journal, records) = Journal::open(path)?;
            if journal.config() != config {
                return Err(JournalError::ConfigMismatch.into());
            }
            let (ledger, summary) = journal::replay_records(&records)?;
            tracing::info!(
                path = %path.display(),
                transactions = summary.transactions,
                head = %summary.head,
                "replayed journal"
            );
            Ok(Self::from_parts(ledger, Some(journal), clock))
        } else {
            let journal = Journal::create(path, config.clone(), clock.now())?;
            Ok(Self::from_parts(Ledger::new(config), Some(journal), clock))
        }
    }

    fn from_parts(ledger: Ledger, journal: Option<Journal>, clock: Arc<dyn Clock>) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(ledger.clone())),
            journal_path: journal.as_ref().map(|j| j.path().to_path_buf()),
            writer: Mutex::new(Writer { ledger, journal }),
            halted: AtomicBool::new(false),
            clock,
        }
    }

    /// Execute `tx` as `caller` at the clock's current time.
    pub fn submit(&self, caller: Address, tx: Transaction) -> Result<Receipt, ServiceError> {
        let mut guard = self.writer.lock();
        let inner = &mut *guard;
        let op = tx.op();
        if self.is_halted() {
            metrics::counter!("ledger_transactions_total", "op" => op, "outcome" => "halted").increment(1);
            return Err(ServiceError::Halted);
        }

        let now = self.clock.now();
        let ctx = CallContext::new(caller, now);
        let journaled = inner.journal.is_some().then(|| tx.clone());
        let outcome = match inner.ledger.execute(&ctx, tx) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::debug!(op, %caller, code = e.code(), error = %e, "transaction rejected");
                metrics::counter!("ledger_transactions_total", "op" => op, "outcome" => "rejected").increment(1);
                return Err(e.into());
            }
        };

        let mut seq = None;
        if let (Some(journal), Some(tx)) = (inner.journal.as_mut(), journaled.as_ref()) {
            match journal.append(now, caller, tx) {
                Ok(record) => seq = Some(record.seq),
                Err(e) => {
                    self.halted.store(true, Ordering::SeqCst);
                    tracing::error!(op, %caller, error = %e, "journal append failed; halting writes");
                    metrics::counter!("ledger_transactions_total", "op" => op, "outcome" => "journal_failed")
                        .increment(1);
                    return Err(e.into());
                }
            }
        }

        let events = inner.ledger.drain_events();
        *self.snapshot.write() = Arc::new(inner.ledger.clone());
        drop(guard);
        for event in &events {
            tracing::info!(event = event.name(), detail = ?event, "ledger event");
        }
        tracing::info!(op, %caller, seq, "transaction committed");
        metrics::counter!("ledger_transactions_total", "op" => op, "outcome" => "committed").increment(1);
        Ok(Receipt {
            outcome,
            events,
            timestamp: now,
            seq,
        })
    }

    /// Run `f` against the latest committed state.
    pub fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.snapshot())
    }

    /// The latest committed state.
    pub fn snapshot(&self) -> Arc<Ledger> {
        Arc::clone(&self.snapshot.read())
    }

    /// The clock's current time.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Whether a journal failure stopped writes.
    pub fn is_halted(&self) -> bool {
        self.halted.load(Ordering::SeqCst)
    }

    /// Whether transactions are being journaled.
    pub fn is_journaled(&self) -> bool {
        self.journal_path.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hire_core::{JobId, ManualClock, UserRole};

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::starting_at(
            Timestamp::parse("2026-07-01T12:00:00Z").unwrap(),
        ))
    }

    fn register(role: UserRole) -> Transaction {
        Transaction::RegisterUser {
            name: "N".into(),
            email: "n@example.com".into(),
            role,
        }
    }

    #[test]
    fn test_submit_stamps_clock_and_returns_events() {
        let clock = clock();
        let service = LedgerService::new(&LedgerConfig::with_admin(Address::derive("admin")), clock.clone());
        let bob = Address::derive("bob");
        service.submit(bob, register(UserRole::Employer)).unwrap();
        clock.advance(30);
        let receipt = service
            .submit(
                bob,
                Transaction::PostJob {
                    title: "Engineer".into(),
                    description: "Rust".into(),
                    deadline: clock.now().plus_secs(60),
                },
            )
            .unwrap();
        assert_eq!(receipt.outcome, Outcome::Job(JobId(1)));
        assert_eq!(receipt.timestamp, clock.now());
        assert_eq!(receipt.seq, None);
        assert_eq!(receipt.events.len(), 1);
        let created = service.read(|l| l.jobs.get_job(JobId(1)).map(|j| j.created_at));
        assert_eq!(created, Ok(clock.now()));
    }

    #[test]
    fn test_rejection_surfaces_ledger_error() {
        let service = LedgerService::new(&LedgerConfig::with_admin(Address::derive("admin")), clock());
        let alice = Address::derive("alice");
        service.submit(alice, register(UserRole::JobSeeker)).unwrap();
        let err = service.submit(alice, register(UserRole::JobSeeker)).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Ledger(LedgerError::AlreadyRegistered(a)) if a == alice
        ));
        assert!(!service.is_halted());
    }

    #[test]
    fn test_open_view_does_not_hold_up_writer() {
        use std::sync::mpsc;
        use std::time::Duration;

        let service = &LedgerService::new(&LedgerConfig::with_admin(Address::derive("admin")), clock());
        let alice = Address::derive("alice");
        let (entered_tx, entered_rx) = mpsc::channel();
        let (committed_tx, committed_rx) = mpsc::channel();

        std::thread::scope(|s| {
            let view = s.spawn(move || {
                service.read(|ledger| {
                    entered_tx.send(()).unwrap();
                    let committed = committed_rx.recv_timeout(Duration::from_secs(5));
                    (committed.is_ok(), ledger.jobs.get_user(alice).is_ok())
                })
            });
            entered_rx.recv().unwrap();
            service.submit(alice, register(UserRole::JobSeeker)).unwrap();
            committed_tx.send(()).unwrap();

            let (writer_finished, saw_new_user) = view.join().unwrap();
            assert!(writer_finished, "writer stalled behind an open view");
            assert!(!saw_new_user, "a running view must keep its snapshot");
        });
        assert!(service.read(|l| l.jobs.get_user(alice).is_ok()));
    }

    #[test]
    fn test_rejected_transaction_keeps_snapshot() {
        let service = LedgerService::new(&LedgerConfig::with_admin(Address::derive("admin")), clock());
        let before = service.snapshot();
        let err = service
            .submit(Address::derive("zed"), Transaction::ApplyForJob { job_id: JobId(1) })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Ledger(LedgerError::NotRegistered(_))));
        assert!(Arc::ptr_eq(&before, &service.snapshot()));
    }

    #[test]
    fn test_open_creates_then_replays() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LedgerConfig::with_admin(Address::derive("admin"));
        config.journal_path = Some(dir.path().join("ledger.jsonl"));
        let clock = clock();
        {
            let service = LedgerService::open(&config, clock.clone()).unwrap();
            assert!(service.is_journaled());
            let receipt = service
                .submit(Address::derive("alice"), register(UserRole::JobSeeker))
                .unwrap();
            assert_eq!(receipt.seq, Some(1));
        }
        let service = LedgerService::open(&config, clock).unwrap();
        assert!(service.read(|l| l.jobs.get_user(Address::derive("alice")).is_ok()));
        let receipt = service
            .submit(Address::derive("bob"), register(UserRole::Employer))
            .unwrap();
        assert_eq!(receipt.seq, Some(2));
    }

    #[test]
    fn test_open_rejects_config_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = LedgerConfig::with_admin(Address::derive("admin"));
        config.journal_path = Some(dir.path().join("ledger.jsonl"));
        LedgerService::open(&config, clock()).unwrap();
        config.certificates.symbol = "OTHER".into();
        assert!(matches!(
            LedgerService::open(&config, clock()),
            Err(ServiceError::Journal(JournalError::ConfigMismatch))
        ));
    }
}
