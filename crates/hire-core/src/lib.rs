//! # hire-core: Foundational Types for the Hiring Ledger
//!
//! This crate is the leaf of the workspace DAG. It defines the primitives
//! shared by the job ledger, the certificate ledger, the HTTP service and
//! the CLI. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `Address`, `JobId`,
//!    `ApplicationId`, `TokenId` are distinct types. A job id cannot be
//!    passed where a token id is expected.
//!
//! 2. **One error taxonomy.** [`LedgerError`] is the single structured
//!    failure reason returned by every ledger operation. Each variant has a
//!    stable machine code.
//!
//! 3. **Capabilities, not role branches.** [`UserRole`] maps to a
//!    [`Capabilities`] bitset once; permission checks ask for a capability.
//!
//! 4. **UTC-only timestamps with an injected clock.** Deadline checks read
//!    time through the [`Clock`] trait so replay and tests are deterministic.
//!
//! 5. **Digests flow through `CanonicalBytes`.** Journal hash chaining only
//!    ever hashes JCS-canonical bytes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hire-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod role;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, LedgerError};
pub use identity::{Address, ApplicationId, JobId, TokenId};
pub use role::{Capabilities, UserRole};
pub use temporal::{Clock, ManualClock, SystemClock, Timestamp};
