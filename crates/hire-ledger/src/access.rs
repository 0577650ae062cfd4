//! # Caller Context and Administrative Authority
//!
//! The administrator address is fixed when a ledger is constructed and
//! passed in explicitly. No operation reads a global owner.

use serde::{Deserialize, Serialize};

use hire_core::{Address, LedgerError, Timestamp};

/// Who is calling and when the call executes.
///
/// `now` is the execution-time clock value stamped by the service and
/// recorded in the journal, so replay sees the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    /// The submitting address.
    pub caller: Address,
    /// Execution time.
    pub now: Timestamp,
}

impl CallContext {
    /// Build a context.
    pub fn new(caller: Address, now: Timestamp) -> Self {
        Self { caller, now }
    }
}

/// The single privileged identity of a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    admin: Address,
}

impl Authority {
    /// Fix the administrator.
    pub fn new(admin: Address) -> Self {
        Self { admin }
    }

    /// The administrator address.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Whether `caller` is the administrator.
    pub fn is_admin(&self, caller: Address) -> bool {
        caller == self.admin
    }

    /// Fail with `Unauthorized` unless `caller` is the administrator.
    pub fn require_admin(&self, caller: Address, action: &str) -> Result<(), LedgerError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(format!(
                "only the administrator may {action}"
            )))
        }
    }
}

/// Fail with `InvalidInput` when `value` is empty.
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), LedgerError> {
    if value.is_empty() {
        Err(LedgerError::InvalidInput(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}
