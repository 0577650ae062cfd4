//! # Error Types: Ledger Failure Taxonomy
//!
//! Every ledger operation either commits completely or returns exactly one
//! [`LedgerError`] and leaves state untouched. Variants carry the ids and
//! addresses involved so callers can render a precise message; `code()`
//! gives a stable machine-readable tag for wire formats.

use thiserror::Error;

use crate::identity::{Address, ApplicationId, JobId, TokenId};
use crate::temporal::Timestamp;

/// Structured failure reason for job and certificate ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Caller lacks the role or ownership the operation requires.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller has no active user record.
    #[error("user must be registered and active: {0}")]
    NotRegistered(Address),

    /// Referenced entity id or address is unknown.
    #[error("not found: {0}")]
    NotFound(String),

    /// A required field is empty or zero-valued.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A job deadline is not strictly after the current time.
    #[error("deadline {deadline} must be after current time {now}")]
    InvalidDeadline {
        /// The requested deadline.
        deadline: Timestamp,
        /// The execution-time clock value.
        now: Timestamp,
    },

    /// The entity's current status does not admit the operation.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The job's application deadline has passed.
    #[error("application deadline for {job} passed at {deadline}")]
    Expired {
        /// The job applied to.
        job: JobId,
        /// Its deadline.
        deadline: Timestamp,
    },

    /// An employer attempted to apply to their own job.
    #[error("cannot apply to own {0}")]
    SelfApplicationForbidden(JobId),

    /// The applicant already has an application for this job.
    #[error("{applicant} already applied for {job}")]
    DuplicateApplication {
        /// The job applied to.
        job: JobId,
        /// The repeat applicant.
        applicant: Address,
    },

    /// The caller already has an active user record.
    #[error("user {0} is already registered")]
    AlreadyRegistered(Address),

    /// The certificate has already been revoked.
    #[error("{0} is already revoked")]
    AlreadyRevoked(TokenId),

    /// The application has already been reviewed.
    #[error("{0} is already reviewed")]
    AlreadyReviewed(ApplicationId),

    /// Access to a revoked certificate's content is blocked.
    #[error("certificate {0} is revoked")]
    Revoked(TokenId),

    /// Parallel batch arrays differ in length.
    #[error("length mismatch: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// The field whose length disagrees with `recipients`.
        field: &'static str,
        /// Number of recipients.
        expected: usize,
        /// Number of entries in `field`.
        actual: usize,
    },

    /// Batch exceeds the configured ceiling.
    #[error("batch of {size} exceeds maximum of {max}")]
    BatchTooLarge {
        /// Requested batch size.
        size: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// Soulbound certificates cannot change holder.
    #[error("soulbound: transfers disabled")]
    TransfersDisabled,

    /// Soulbound certificates cannot be approved for transfer.
    #[error("soulbound: approvals disabled")]
    ApprovalsDisabled,
}

impl LedgerError {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotRegistered(_) => "NOT_REGISTERED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidDeadline { .. } => "INVALID_DEADLINE",
            Self::InvalidState(_) => "INVALID_STATE",
            Self::Expired { .. } => "EXPIRED",
            Self::SelfApplicationForbidden(_) => "SELF_APPLICATION_FORBIDDEN",
            Self::DuplicateApplication { .. } => "DUPLICATE_APPLICATION",
            Self::AlreadyRegistered(_) => "ALREADY_REGISTERED",
            Self::AlreadyRevoked(_) => "ALREADY_REVOKED",
            Self::AlreadyReviewed(_) => "ALREADY_REVIEWED",
            Self::Revoked(_) => "REVOKED",
            Self::LengthMismatch { .. } => "LENGTH_MISMATCH",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::TransfersDisabled => "TRANSFERS_DISABLED",
            Self::ApprovalsDisabled => "APPROVALS_DISABLED",
        }
    }
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
