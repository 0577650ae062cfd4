//! # Verification Relay
//!
//! Bridges an external identity-proof verifier to the job ledger. The
//! relay validates a submitted proof through a [`ProofVerifier`] and, on
//! success, submits exactly one `MarkVerified` transaction signed as the
//! relay's own address. That address must be the ledger's designated
//! verifier, otherwise the ledger rejects the call.
//!
//! Proof checking itself happens behind the trait. This crate never
//! inspects proof bytes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hire_core::Address;

use crate::service::{LedgerService, Receipt, ServiceError};
use crate::tx::Transaction;

/// A proof as received from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofSubmission {
    /// The user the proof is claimed for.
    pub user: Address,
    /// Document type (passport, ID card, ...), as numbered by the verifier.
    pub attestation_id: u32,
    /// Opaque proof object.
    pub proof: serde_json::Value,
    pub public_signals: Vec<String>,
    /// Hex-encoded user context bound into the proof.
    pub user_context_data: String,
}

impl ProofSubmission {
    /// Reject submissions with missing parts before calling the verifier.
    pub fn check_complete(&self) -> Result<(), VerificationError> {
        if self.proof.is_null() {
            return Err(VerificationError::MissingField("proof"));
        }
        if self.public_signals.is_empty() {
            return Err(VerificationError::MissingField("public_signals"));
        }
        if self.user_context_data.is_empty() {
            return Err(VerificationError::MissingField("user_context_data"));
        }
        if self.user.is_zero() {
            return Err(VerificationError::MissingField("user"));
        }
        Ok(())
    }
}

/// Why a proof was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("proof submission is missing `{0}`")]
    MissingField(&'static str),

    #[error("proof rejected: {0}")]
    Rejected(String),

    #[error("proof bound to {proven}, not the claimed user {claimed}")]
    SubjectMismatch { claimed: Address, proven: Address },

    #[error("verifier unavailable: {0}")]
    Unavailable(String),
}

/// External proof checker.
pub trait ProofVerifier: Send + Sync {
    /// Validate the proof and return the address it proves.
    fn verify(&self, submission: &ProofSubmission) -> Result<Address, VerificationError>;
}

/// Errors from [`VerificationRelay::relay`].
#[derive(Error, Debug)]
pub enum RelayError {
    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Verifier-to-ledger bridge.
pub struct VerificationRelay<V> {
    verifier: V,
    relay_address: Address,
}

impl<V: ProofVerifier> VerificationRelay<V> {
    /// Relay that submits as `relay_address`.
    pub fn new(verifier: V, relay_address: Address) -> Self {
        Self {
            verifier,
            relay_address,
        }
    }

    /// The address `MarkVerified` is submitted as.
    pub fn relay_address(&self) -> Address {
        self.relay_address
    }

    /// Validate `submission` and mark its user verified.
    ///
    /// A failed proof never reaches the ledger.
    pub fn relay(&self, service: &LedgerService, submission: &ProofSubmission) -> Result<Receipt, RelayError> {
        submission.check_complete()?;
        let proven = self.verifier.verify(submission).map_err(|e| {
            tracing::warn!(user = %submission.user, error = %e, "proof verification failed");
            e
        })?;
        if proven != submission.user {
            return Err(VerificationError::SubjectMismatch {
                claimed: submission.user,
                proven,
            }
            .into());
        }
        let receipt = service.submit(self.relay_address, Transaction::MarkVerified { user: proven })?;
        tracing::info!(user = %proven, "relayed verification");
        Ok(receipt)
    }
}
