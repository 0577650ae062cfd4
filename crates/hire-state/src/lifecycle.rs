//! # Generic Lifecycle Transitions
//!
//! The ledgers never assign a status field directly. They call
//! [`transition()`], which rejects edges missing from the status enum's
//! table and produces the record appended to the entity's history.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use hire_core::Timestamp;

/// A closed set of statuses with a fixed transition table.
pub trait Lifecycle: Copy + Eq + std::fmt::Display {
    /// Entity kind used in error messages (e.g. `"job"`).
    const ENTITY: &'static str;

    /// Whether `self → to` is a legal edge.
    fn can_transition_to(&self, to: Self) -> bool;

    /// Whether no edge leaves this status.
    fn is_terminal(&self) -> bool;
}

/// A rejected status change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The edge is not in the transition table.
    #[error("invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        /// Entity kind.
        entity: &'static str,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// The entity is already in a terminal status.
    #[error("{entity} is in terminal state {state}")]
    TerminalState {
        /// Entity kind.
        entity: &'static str,
        /// The terminal status.
        state: String,
    },
}

/// One entry of an entity's ordered status history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord<S> {
    /// Status before the change.
    pub from: S,
    /// Status after the change.
    pub to: S,
    /// Execution time of the transaction that made the change.
    pub timestamp: Timestamp,
}

/// Move `current` to `to`, returning the history record.
///
/// `current` is left unchanged on error.
pub fn transition<S: Lifecycle>(
    current: &mut S,
    to: S,
    at: Timestamp,
) -> Result<TransitionRecord<S>, TransitionError> {
    let from = *current;
    if from.is_terminal() {
        return Err(TransitionError::TerminalState {
            entity: S::ENTITY,
            state: from.to_string(),
        });
    }
    if !from.can_transition_to(to) {
        return Err(TransitionError::InvalidTransition {
            entity: S::ENTITY,
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    *current = to;
    Ok(TransitionRecord {
        from,
        to,
        timestamp: at,
    })
}
