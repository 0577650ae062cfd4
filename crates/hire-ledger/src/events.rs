//! # Ledger Events
//!
//! Emitted after a mutation commits, in commit order. Rejected operations
//! emit nothing. External indexers consume these; the service logs them.

use serde::{Deserialize, Serialize};

use hire_core::{Address, ApplicationId, JobId, TokenId, UserRole};

/// A committed state change visible to external consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A user registered.
    UserRegistered {
        user: Address,
        name: String,
        role: UserRole,
    },
    /// A user changed their profile fields.
    UserProfileUpdated { user: Address },
    /// The verifier set a user's verified flag.
    UserVerified { user: Address },
    /// The verifier cleared a user's verified flag.
    VerificationRemoved { user: Address },
    /// The verifier address was set or rotated.
    BackendAddressUpdated {
        old: Option<Address>,
        new: Address,
    },
    /// A job was posted.
    JobPosted {
        job_id: JobId,
        employer: Address,
        title: String,
    },
    /// A job's title or description changed.
    JobUpdated { job_id: JobId, title: String },
    /// A job was closed.
    JobClosed { job_id: JobId },
    /// An application was submitted.
    ApplicationSubmitted {
        application_id: ApplicationId,
        job_id: JobId,
        applicant: Address,
    },
    /// An application was reviewed.
    ApplicationReviewed {
        application_id: ApplicationId,
        job_id: JobId,
    },
    /// A certificate was issued.
    Attest {
        holder: Address,
        token_id: TokenId,
        certificate_type: String,
    },
    /// A batch of certificates was issued.
    BatchAttest {
        token_ids: Vec<TokenId>,
        certificate_type: String,
    },
    /// A certificate was revoked.
    Revoke { holder: Address, token_id: TokenId },
    /// A certificate was burned.
    Burn { holder: Address, token_id: TokenId },
}

impl LedgerEvent {
    /// snake_case event name, identical to the serde tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::UserRegistered { .. } => "user_registered",
            Self::UserProfileUpdated { .. } => "user_profile_updated",
            Self::UserVerified { .. } => "user_verified",
            Self::VerificationRemoved { .. } => "verification_removed",
            Self::BackendAddressUpdated { .. } => "backend_address_updated",
            Self::JobPosted { .. } => "job_posted",
            Self::JobUpdated { .. } => "job_updated",
            Self::JobClosed { .. } => "job_closed",
            Self::ApplicationSubmitted { .. } => "application_submitted",
            Self::ApplicationReviewed { .. } => "application_reviewed",
            Self::Attest { .. } => "attest",
            Self::BatchAttest { .. } => "batch_attest",
            Self::Revoke { .. } => "revoke",
            Self::Burn { .. } => "burn",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_matches_serde_tag() {
        let events = [
            LedgerEvent::JobClosed { job_id: JobId(1) },
            LedgerEvent::BatchAttest {
                token_ids: vec![TokenId(1), TokenId(2)],
                certificate_type: "Diploma".into(),
            },
            LedgerEvent::BackendAddressUpdated {
                old: None,
                new: Address::derive("relay"),
            },
        ];
        for event in &events {
            let json = serde_json::to_value(event).unwrap();
            assert_eq!(json["event"], event.name());
        }
    }
}
