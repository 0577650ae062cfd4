//! # hire-state: Lifecycle State Machines
//!
//! Every ledger entity with a status carries a closed enum implementing
//! [`Lifecycle`]. Status changes go through the single generic
//! [`transition()`] function, which checks the edge against the enum's
//! transition table and returns a [`TransitionRecord`] for the entity's
//! history.
//!
//! ## State Machines
//!
//! - **Job** (`job.rs`): `Active → Closed`.
//! - **Application** (`application.rs`): `Pending → Reviewed`.
//! - **Certificate** (`certificate.rs`): `Active → Revoked`,
//!   `Active | Revoked → Burned`.
//!
//! All three are one-way. There is no reopen, unreview, or unrevoke edge,
//! so a terminal status can never be left.

pub mod application;
pub mod certificate;
pub mod job;
pub mod lifecycle;

pub use application::ApplicationStatus;
pub use certificate::CertificateStatus;
pub use job::JobStatus;
pub use lifecycle::{transition, Lifecycle, TransitionError, TransitionRecord};
