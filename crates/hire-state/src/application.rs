//! # Application Lifecycle
//!
//! ```text
//! Pending ──review──▶ Reviewed (terminal)
//! ```

use serde::{Deserialize, Serialize};

use crate::lifecycle::Lifecycle;

/// Review status of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Submitted, not yet reviewed.
    Pending,
    /// Reviewed by the job's employer.
    Reviewed,
}

impl Lifecycle for ApplicationStatus {
    const ENTITY: &'static str = "application";

    fn can_transition_to(&self, to: Self) -> bool {
        matches!((self, to), (Self::Pending, Self::Reviewed))
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Reviewed)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "PENDING",
            Self::Reviewed => "REVIEWED",
        })
    }
}
