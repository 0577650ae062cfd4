//! # Certificate Lifecycle
//!
//! ```text
//! Active ──revoke──▶ Revoked
//!   │                  │
//!   └──burn──▶ Burned ◀┘ (terminal, record removed)
//! ```
//!
//! `Burned` never appears on a stored record. The certificate ledger runs
//! the transition to validate the burn and then drops the record.

use serde::{Deserialize, Serialize};

use crate::lifecycle::Lifecycle;

/// Status of a soulbound certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateStatus {
    /// Issued and valid.
    Active,
    /// Revoked by the issuer. Still verifiable, no longer valid.
    Revoked,
    /// Destroyed by holder or issuer.
    Burned,
}

impl CertificateStatus {
    /// Whether the certificate has been revoked.
    pub fn is_revoked(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl Lifecycle for CertificateStatus {
    const ENTITY: &'static str = "certificate";

    fn can_transition_to(&self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Active, Self::Revoked) | (Self::Active, Self::Burned) | (Self::Revoked, Self::Burned)
        )
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Burned)
    }
}

impl std::fmt::Display for CertificateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Active => "ACTIVE",
            Self::Revoked => "REVOKED",
            Self::Burned => "BURNED",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use CertificateStatus::*;
        let legal = [(Active, Revoked), (Active, Burned), (Revoked, Burned)];
        for from in [Active, Revoked, Burned] {
            for to in [Active, Revoked, Burned] {
                assert_eq!(
                    from.can_transition_to(to),
                    legal.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
        assert!(Burned.is_terminal());
        assert!(!Revoked.is_terminal());
    }
}
