//! # Temporal Types: UTC Timestamps and Clocks
//!
//! `Timestamp` is a UTC instant truncated to whole seconds. Ledger deadlines
//! and issuance times are Unix-epoch seconds, so sub-second precision would
//! only introduce ordering noise between the journal and a replay.
//!
//! "Now" is never read directly by ledger code. The service stamps each
//! transaction with the value of an injected [`Clock`], and the journal
//! records that value so replay sees the same instant.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`]: current UTC time, truncated.
/// - [`Timestamp::from_epoch_secs()`]: from Unix seconds.
/// - [`Timestamp::parse()`]: from an RFC 3339 string with `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 timestamp. Only the `Z` suffix is accepted.
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        if !s.ends_with('Z') {
            return Err(LedgerError::InvalidInput(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            LedgerError::InvalidInput(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Create a timestamp from a Unix epoch timestamp (seconds).
    pub fn from_epoch_secs(secs: i64) -> Result<Self, LedgerError> {
        let dt = DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| LedgerError::InvalidInput(format!("invalid Unix timestamp: {secs}")))?;
        Ok(Self(dt))
    }

    /// Returns the Unix epoch timestamp in seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// This instant shifted by `secs` seconds (negative moves backwards).
    ///
    /// Saturates at the representable range instead of wrapping.
    pub fn plus_secs(&self, secs: i64) -> Self {
        let shifted =
            chrono::TimeDelta::try_seconds(secs).and_then(|d| self.0.checked_add_signed(d));
        match shifted {
            Some(dt) => Self(dt),
            None if secs < 0 => Self(DateTime::<Utc>::MIN_UTC),
            None => Self(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ─── Clocks ──────────────────────────────────────────────────────────

/// Source of "now" for deadline checks and record timestamps.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Wall-clock time of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to. Used by tests, the demo, and
/// anywhere a deterministic sequence of instants is required.
#[derive(Debug)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    /// Start the clock at the given instant.
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            secs: AtomicI64::new(start.epoch_secs()),
        }
    }

    /// Move the clock forward (or backward, for negative values).
    pub fn advance(&self, secs: i64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    /// Jump to an absolute instant.
    pub fn set(&self, at: Timestamp) {
        self.secs.store(at.epoch_secs(), Ordering::SeqCst);
    }

    /// The instant the clock currently shows.
    pub fn now(&self) -> Timestamp {
        let secs = self.secs.load(Ordering::SeqCst);
        Timestamp::from_epoch_secs(secs).unwrap_or_else(|_| Timestamp::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        ManualClock::now(self)
    }
}
