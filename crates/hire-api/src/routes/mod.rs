//! # API Route Modules
//!
//! - `users`: registration, profiles, verification status and the
//!   verifier-role administration endpoints.
//! - `jobs`: postings, listings, closing and ledger statistics.
//! - `applications`: application records and employer review.
//! - `certificates`: soulbound certificate issuance, revocation, burn,
//!   public verification and the always-rejected transfer surface.
//!
//! Mutating handlers build a [`Transaction`] and hand it to the ledger
//! service; they answer with the service's [`Receipt`].

pub mod applications;
pub mod certificates;
pub mod jobs;
pub mod users;

use hire_ledger::{Receipt, Transaction};

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Submit `tx` as `caller` off the async runtime.
///
/// A journaled commit ends in an fsync, so the write runs on the
/// blocking pool.
pub(crate) async fn submit(state: &AppState, caller: Caller, tx: Transaction) -> Result<Receipt, AppError> {
    let service = state.service.clone();
    tokio::task::spawn_blocking(move || service.submit(caller.0, tx))
        .await
        .map_err(|e| AppError::Internal(format!("ledger task failed: {e}")))?
        .map_err(AppError::from)
}
