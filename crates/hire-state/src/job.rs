//! # Job Lifecycle
//!
//! ```text
//! Active ──close──▶ Closed (terminal)
//! ```

use serde::{Deserialize, Serialize};

use crate::lifecycle::Lifecycle;

/// Status of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepting applications until the deadline.
    Active,
    /// Closed by its employer. Irreversible.
    Closed,
}

impl JobStatus {
    /// Whether the job accepts applications and updates.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl Lifecycle for JobStatus {
    const ENTITY: &'static str = "job";

    fn can_transition_to(&self, to: Self) -> bool {
        matches!((self, to), (Self::Active, Self::Closed))
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Active => "ACTIVE",
            Self::Closed => "CLOSED",
        })
    }
}
