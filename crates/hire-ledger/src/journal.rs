//! # Transaction Journal
//!
//! The only persistence format: an append-only JSON-lines file of accepted
//! transactions. Line 0 is the genesis record carrying the
//! [`LedgerConfig`]; every later line is one committed transaction with
//! the caller and execution time it ran under.
//!
//! ## Hash chain
//!
//! Each record stores the digest of its predecessor (`prev`, all-zero for
//! genesis) and its own `digest`, the SHA-256 of the JCS-canonical bytes
//! of `{seq, timestamp, entry, prev}`. [`verify`] recomputes the chain,
//! so an edited, reordered or truncated-in-the-middle file is rejected.
//!
//! ## Replay
//!
//! [`replay`] re-executes every transaction against a fresh [`Ledger`].
//! Every journaled transaction was accepted when it ran, so a rejection
//! on replay means the file and the code disagree.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hire_core::{sha256_digest, Address, CanonicalBytes, CanonicalizationError, ContentDigest, LedgerError, Timestamp};

use crate::access::CallContext;
use crate::config::LedgerConfig;
use crate::tx::{Ledger, Transaction};

/// Errors reading, writing, verifying or replaying a journal.
#[derive(Error, Debug)]
pub enum JournalError {
    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("journal already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("journal is empty; expected a genesis record")]
    MissingGenesis,

    #[error("malformed journal line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("record {found} out of sequence (expected {expected})")]
    SequenceGap { expected: u64, found: u64 },

    #[error("record {seq} does not chain to its predecessor")]
    BrokenChain { seq: u64 },

    #[error("record {seq} digest mismatch: stored {stored}, computed {computed}")]
    DigestMismatch {
        seq: u64,
        stored: ContentDigest,
        computed: ContentDigest,
    },

    #[error("journal genesis config differs from the supplied config")]
    ConfigMismatch,

    #[error("replay diverged at record {seq} ({op}): {source}")]
    ReplayDivergence {
        seq: u64,
        op: &'static str,
        #[source]
        source: LedgerError,
    },

    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Payload of a journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JournalEntry {
    /// First record: the configuration the ledger was built from.
    Genesis { config: LedgerConfig },
    /// An accepted transaction.
    Transaction { caller: Address, tx: Transaction },
}

/// One line of the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalRecord {
    pub seq: u64,
    pub timestamp: Timestamp,
    pub entry: JournalEntry,
    pub prev: ContentDigest,
    pub digest: ContentDigest,
}

#[derive(Serialize)]
struct DigestInput<'a> {
    seq: u64,
    timestamp: &'a Timestamp,
    entry: &'a JournalEntry,
    prev: &'a ContentDigest,
}

impl JournalRecord {
    fn seal(seq: u64, timestamp: Timestamp, entry: JournalEntry, prev: ContentDigest) -> Result<Self, JournalError> {
        let digest = compute_digest(seq, &timestamp, &entry, &prev)?;
        Ok(Self {
            seq,
            timestamp,
            entry,
            prev,
            digest,
        })
    }
}

fn compute_digest(
    seq: u64,
    timestamp: &Timestamp,
    entry: &JournalEntry,
    prev: &ContentDigest,
) -> Result<ContentDigest, JournalError> {
    let bytes = CanonicalBytes::new(&DigestInput {
        seq,
        timestamp,
        entry,
        prev,
    })?;
    Ok(sha256_digest(&bytes))
}

/// Counts produced by a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub records: u64,
    pub transactions: u64,
    pub by_op: BTreeMap<String, u64>,
    pub head: ContentDigest,
}

/// Append handle on a journal file.
#[derive(Debug)]
pub struct Journal {
    path: PathBuf,
    file: File,
    config: LedgerConfig,
    next_seq: u64,
    head: ContentDigest,
}

impl Journal {
    /// Create a new journal and write its genesis record.
    ///
    /// Fails if the file exists.
    pub fn create(path: &Path, config: LedgerConfig, at: Timestamp) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => JournalError::AlreadyExists(path.to_path_buf()),
                _ => JournalError::Io(e),
            })?;
        let genesis = JournalRecord::seal(
            0,
            at,
            JournalEntry::Genesis { config: config.clone() },
            ContentDigest::zero(),
        )?;
        write_record(&mut file, &genesis)?;
        tracing::info!(path = %path.display(), "created journal");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            config,
            next_seq: 1,
            head: genesis.digest,
        })
    }

    /// Verify an existing journal and position it for appending.
    ///
    /// Returns the verified records so the caller can rebuild state.
    pub fn open(path: &Path) -> Result<(Self, Vec<JournalRecord>), JournalError> {
        let records = verify(path)?;
        let config = genesis_config(&records)?.clone();
        let last = records.last().ok_or(JournalError::MissingGenesis)?;
        let (next_seq, head) = (last.seq + 1, last.digest);
        let file = OpenOptions::new().append(true).open(path)?;
        tracing::info!(path = %path.display(), records = records.len(), "opened journal");
        Ok((
            Self {
                path: path.to_path_buf(),
                file,
                config,
                next_seq,
                head,
            },
            records,
        ))
    }

    /// Append one accepted transaction and sync it to disk.
    pub fn append(&mut self, timestamp: Timestamp, caller: Address, tx: &Transaction) -> Result<JournalRecord, JournalError> {
        let record = JournalRecord::seal(
            self.next_seq,
            timestamp,
            JournalEntry::Transaction {
                caller,
                tx: tx.clone(),
            },
            self.head,
        )?;
        write_record(&mut self.file, &record)?;
        self.next_seq += 1;
        self.head = record.digest;
        Ok(record)
    }

    /// Configuration from the genesis record.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// File location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sequence number the next append will get.
    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Digest of the last record.
    pub fn head(&self) -> ContentDigest {
        self.head
    }
}

fn write_record(file: &mut File, record: &JournalRecord) -> Result<(), JournalError> {
    let mut line = serde_json::to_string(record).map_err(CanonicalizationError::from)?;
    line.push('\n');
    file.write_all(line.as_bytes())?;
    file.sync_data()?;
    Ok(())
}

fn genesis_config(records: &[JournalRecord]) -> Result<&LedgerConfig, JournalError> {
    match records.first() {
        Some(JournalRecord {
            entry: JournalEntry::Genesis { config },
            ..
        }) => Ok(config),
        _ => Err(JournalError::MissingGenesis),
    }
}

/// Read every record and check sequence numbers and the digest chain.
pub fn verify(path: &Path) -> Result<Vec<JournalRecord>, JournalError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    let mut prev = ContentDigest::zero();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: JournalRecord = serde_json::from_str(&line).map_err(|e| JournalError::Malformed {
            line: line_no + 1,
            reason: e.to_string(),
        })?;
        let expected = records.len() as u64;
        if record.seq != expected {
            return Err(JournalError::SequenceGap {
                expected,
                found: record.seq,
            });
        }
        let is_genesis = matches!(record.entry, JournalEntry::Genesis { .. });
        if is_genesis != (record.seq == 0) {
            return Err(JournalError::Malformed {
                line: line_no + 1,
                reason: "genesis must be the first and only genesis record".into(),
            });
        }
        if record.prev != prev {
            return Err(JournalError::BrokenChain { seq: record.seq });
        }
        let computed = compute_digest(record.seq, &record.timestamp, &record.entry, &record.prev)?;
        if computed != record.digest {
            return Err(JournalError::DigestMismatch {
                seq: record.seq,
                stored: record.digest,
                computed,
            });
        }
        prev = record.digest;
        records.push(record);
    }
    if records.is_empty() {
        return Err(JournalError::MissingGenesis);
    }
    Ok(records)
}

/// Rebuild a ledger from verified records.
pub fn replay_records(records: &[JournalRecord]) -> Result<(Ledger, ReplaySummary), JournalError> {
    let config = genesis_config(records)?;
    let mut ledger = Ledger::new(config);
    let mut by_op = BTreeMap::new();
    let mut transactions = 0u64;
    for record in records {
        let JournalEntry::Transaction { caller, tx } = &record.entry else {
            continue;
        };
        let op = tx.op();
        let ctx = CallContext::new(*caller, record.timestamp);
        ledger
            .execute(&ctx, tx.clone())
            .map_err(|source| JournalError::ReplayDivergence {
                seq: record.seq,
                op,
                source,
            })?;
        ledger.drain_events();
        *by_op.entry(op.to_string()).or_insert(0) += 1;
        transactions += 1;
    }
    let head = records.last().map(|r| r.digest).unwrap_or_else(ContentDigest::zero);
    Ok((
        ledger,
        ReplaySummary {
            records: records.len() as u64,
            transactions,
            by_op,
            head,
        },
    ))
}

/// Verify a journal file and rebuild the ledger it describes.
pub fn replay(path: &Path) -> Result<(Ledger, ReplaySummary), JournalError> {
    let records = verify(path)?;
    replay_records(&records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hire_core::UserRole;

    fn at(secs: i64) -> Timestamp {
        Timestamp::parse("2026-06-01T00:00:00Z").unwrap().plus_secs(secs)
    }

    fn register(name: &str) -> Transaction {
        Transaction::RegisterUser {
            name: name.into(),
            email: format!("{name}@example.com"),
            role: UserRole::Both,
        }
    }

    #[test]
    fn test_create_append_verify() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let config = LedgerConfig::with_admin(Address::derive("admin"));
        let mut journal = Journal::create(&path, config.clone(), at(0)).unwrap();
        let first = journal.append(at(1), Address::derive("alice"), &register("alice")).unwrap();
        let second = journal.append(at(2), Address::derive("bob"), &register("bob")).unwrap();
        assert_eq!(second.prev, first.digest);
        assert_eq!(journal.next_seq(), 3);

        let records = verify(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].prev, ContentDigest::zero());
        assert_eq!(records[2], second);
        assert_eq!(genesis_config(&records).unwrap(), &config);
    }

    #[test]
    fn test_create_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let config = LedgerConfig::with_admin(Address::derive("admin"));
        Journal::create(&path, config.clone(), at(0)).unwrap();
        assert!(matches!(
            Journal::create(&path, config, at(0)),
            Err(JournalError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_open_resumes_chain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let config = LedgerConfig::with_admin(Address::derive("admin"));
        let mut journal = Journal::create(&path, config, at(0)).unwrap();
        journal.append(at(1), Address::derive("alice"), &register("alice")).unwrap();
        let head = journal.head();
        drop(journal);

        let (mut reopened, records) = Journal::open(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(reopened.head(), head);
        let next = reopened.append(at(2), Address::derive("bob"), &register("bob")).unwrap();
        assert_eq!(next.seq, 2);
        assert_eq!(next.prev, head);
        assert_eq!(verify(&path).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_file_has_no_genesis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(verify(&path), Err(JournalError::MissingGenesis)));
    }

    #[test]
    fn test_replay_counts_ops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let mut journal = Journal::create(&path, LedgerConfig::with_admin(Address::derive("admin")), at(0)).unwrap();
        journal.append(at(1), Address::derive("alice"), &register("alice")).unwrap();
        journal.append(at(2), Address::derive("bob"), &register("bob")).unwrap();
        let (ledger, summary) = replay(&path).unwrap();
        assert_eq!(summary.records, 3);
        assert_eq!(summary.transactions, 2);
        assert_eq!(summary.by_op.get("register_user"), Some(&2));
        assert_eq!(summary.head, journal.head());
        assert!(ledger.jobs.get_user(Address::derive("bob")).is_ok());
    }

    #[test]
    fn test_replay_divergence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.jsonl");
        let mut journal = Journal::create(&path, LedgerConfig::with_admin(Address::derive("admin")), at(0)).unwrap();
        journal.append(at(1), Address::derive("alice"), &register("alice")).unwrap();
        // A second registration by the same caller cannot have been accepted.
        journal.append(at(2), Address::derive("alice"), &register("alice")).unwrap();
        match replay(&path) {
            Err(JournalError::ReplayDivergence { seq, op, source }) => {
                assert_eq!(seq, 2);
                assert_eq!(op, "register_user");
                assert_eq!(source, LedgerError::AlreadyRegistered(Address::derive("alice")));
            }
            other => panic!("expected divergence, got {other:?}"),
        }
    }
}
