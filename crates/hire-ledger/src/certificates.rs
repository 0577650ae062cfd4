//! # Certificate Ledger
//!
//! Soulbound certificates. The administrator is the only issuer. A
//! certificate never changes holder: every transfer or approval entry
//! point fails unconditionally. Burning removes the record from the arena
//! and from both indices, but the ever-issued counter keeps counting it
//! and its id is never reused.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use hire_core::{Address, LedgerError, Timestamp, TokenId};
use hire_state::{transition, CertificateStatus, TransitionRecord};

use crate::access::{require_non_empty, Authority, CallContext};
use crate::events::LedgerEvent;
use crate::index::Index;

/// Default ceiling on certificates per batch mint.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 100;

/// A soulbound credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: TokenId,
    pub holder: Address,
    pub metadata_uri: String,
    pub issued_at: Timestamp,
    pub certificate_type: String,
    pub subject_name: String,
    pub course_name: String,
    pub grade: String,
    pub status: CertificateStatus,
    pub history: Vec<TransitionRecord<CertificateStatus>>,
}

impl Certificate {
    /// Whether the certificate has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.status.is_revoked()
    }
}

/// Parallel arrays describing one batch mint. All arrays must have the
/// same length as `recipients`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateBatch {
    pub recipients: Vec<Address>,
    pub metadata_uris: Vec<String>,
    pub subject_names: Vec<String>,
    pub course_names: Vec<String>,
    pub grades: Vec<String>,
}

/// Full certificate content returned to the issuer or holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateDetails {
    pub metadata_uri: String,
    pub issued_at: Timestamp,
    pub certificate_type: String,
    pub subject_name: String,
    pub course_name: String,
    pub grade: String,
    pub revoked: bool,
}

/// Public verification result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateVerification {
    pub holder: Address,
    pub certificate_type: String,
    pub valid: bool,
}

/// Public verification result with subject fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedVerification {
    pub holder: Address,
    pub certificate_type: String,
    pub subject_name: String,
    pub course_name: String,
    pub issued_at: Timestamp,
    pub valid: bool,
}

struct MintItem {
    recipient: Address,
    metadata_uri: String,
    subject_name: String,
    course_name: String,
    grade: String,
}

/// Registry of soulbound certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateLedger {
    authority: Authority,
    name: String,
    symbol: String,
    max_batch_size: usize,
    certificates: BTreeMap<TokenId, Certificate>,
    next_token: TokenId,
    total_issued: u64,
    holder_tokens: Index<Address, TokenId>,
    type_tokens: Index<String, TokenId>,
    events: Vec<LedgerEvent>,
}

impl CertificateLedger {
    /// Empty collection issued by `admin`.
    pub fn new(admin: Address, name: String, symbol: String, max_batch_size: usize) -> Self {
        Self {
            authority: Authority::new(admin),
            name,
            symbol,
            max_batch_size,
            certificates: BTreeMap::new(),
            next_token: TokenId::FIRST,
            total_issued: 0,
            holder_tokens: Index::new(),
            type_tokens: Index::new(),
            events: Vec::new(),
        }
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Issuance ────────────────────────────────────────────────────

    /// Issue one certificate.
    #[allow(clippy::too_many_arguments)]
    pub fn mint_certificate(
        &mut self,
        ctx: &CallContext,
        recipient: Address,
        metadata_uri: String,
        certificate_type: String,
        subject_name: String,
        course_name: String,
        grade: String,
    ) -> Result<TokenId, LedgerError> {
        self.authority.require_admin(ctx.caller, "mint certificates")?;
        require_non_empty("certificate type", &certificate_type)?;
        let item = MintItem {
            recipient,
            metadata_uri,
            subject_name,
            course_name,
            grade,
        };
        validate_item(&item)?;
        let id = self.issue(ctx.now, item, &certificate_type);
        Ok(id)
    }

    /// Issue a batch with full subject details. All or nothing.
    pub fn batch_mint_certificates(
        &mut self,
        ctx: &CallContext,
        batch: CertificateBatch,
        certificate_type: String,
    ) -> Result<Vec<TokenId>, LedgerError> {
        self.authority.require_admin(ctx.caller, "mint certificates")?;
        let n = batch.recipients.len();
        check_len("metadata_uris", n, batch.metadata_uris.len())?;
        check_len("subject_names", n, batch.subject_names.len())?;
        check_len("course_names", n, batch.course_names.len())?;
        check_len("grades", n, batch.grades.len())?;
        let items = batch
            .recipients
            .into_iter()
            .zip(batch.metadata_uris)
            .zip(batch.subject_names)
            .zip(batch.course_names)
            .zip(batch.grades)
            .map(|((((recipient, metadata_uri), subject_name), course_name), grade)| MintItem {
                recipient,
                metadata_uri,
                subject_name,
                course_name,
                grade,
            })
            .collect();
        self.issue_batch(ctx, items, certificate_type)
    }

    /// Issue a batch with URIs only. All or nothing.
    pub fn batch_mint_certificates_simple(
        &mut self,
        ctx: &CallContext,
        recipients: Vec<Address>,
        metadata_uris: Vec<String>,
        certificate_type: String,
    ) -> Result<Vec<TokenId>, LedgerError> {
        self.authority.require_admin(ctx.caller, "mint certificates")?;
        check_len("metadata_uris", recipients.len(), metadata_uris.len())?;
        let items = recipients
            .into_iter()
            .zip(metadata_uris)
            .map(|(recipient, metadata_uri)| MintItem {
                recipient,
                metadata_uri,
                subject_name: String::new(),
                course_name: String::new(),
                grade: String::new(),
            })
            .collect();
        self.issue_batch(ctx, items, certificate_type)
    }

    fn issue_batch(
        &mut self,
        ctx: &CallContext,
        items: Vec<MintItem>,
        certificate_type: String,
    ) -> Result<Vec<TokenId>, LedgerError> {
        if items.is_empty() {
            return Err(LedgerError::InvalidInput("batch must not be empty".into()));
        }
        if items.len() > self.max_batch_size {
            return Err(LedgerError::BatchTooLarge {
                size: items.len(),
                max: self.max_batch_size,
            });
        }
        require_non_empty("certificate type", &certificate_type)?;
        items.iter().try_for_each(validate_item)?;

        let token_ids: Vec<TokenId> = items
            .into_iter()
            .map(|item| self.issue(ctx.now, item, &certificate_type))
            .collect();
        self.events.push(LedgerEvent::BatchAttest {
            token_ids: token_ids.clone(),
            certificate_type,
        });
        Ok(token_ids)
    }

    fn issue(&mut self, now: Timestamp, item: MintItem, certificate_type: &str) -> TokenId {
        let id = self.next_token;
        self.next_token = id.next();
        self.total_issued += 1;
        self.holder_tokens.insert(item.recipient, id);
        self.type_tokens.insert(certificate_type.to_string(), id);
        self.events.push(LedgerEvent::Attest {
            holder: item.recipient,
            token_id: id,
            certificate_type: certificate_type.to_string(),
        });
        self.certificates.insert(
            id,
            Certificate {
                id,
                holder: item.recipient,
                metadata_uri: item.metadata_uri,
                issued_at: now,
                certificate_type: certificate_type.to_string(),
                subject_name: item.subject_name,
                course_name: item.course_name,
                grade: item.grade,
                status: CertificateStatus::Active,
                history: Vec::new(),
            },
        );
        id
    }

    // ── Issuer operations ───────────────────────────────────────────

    /// Revoke a certificate. One-way.
    pub fn revoke_certificate(&mut self, ctx: &CallContext, token_id: TokenId) -> Result<(), LedgerError> {
        self.authority.require_admin(ctx.caller, "revoke certificates")?;
        let cert = self.certificate_mut(token_id)?;
        let record = transition(&mut cert.status, CertificateStatus::Revoked, ctx.now)
            .map_err(|_| LedgerError::AlreadyRevoked(token_id))?;
        cert.history.push(record);
        let holder = cert.holder;
        self.events.push(LedgerEvent::Revoke { holder, token_id });
        Ok(())
    }

    /// Rewrite subject, course and grade. Allowed on revoked certificates.
    pub fn update_certificate_details(
        &mut self,
        ctx: &CallContext,
        token_id: TokenId,
        subject_name: String,
        course_name: String,
        grade: String,
    ) -> Result<(), LedgerError> {
        self.authority.require_admin(ctx.caller, "update certificates")?;
        let cert = self.certificate_mut(token_id)?;
        cert.subject_name = subject_name;
        cert.course_name = course_name;
        cert.grade = grade;
        Ok(())
    }

    /// Destroy a certificate. Holder or issuer.
    pub fn burn_certificate(&mut self, ctx: &CallContext, token_id: TokenId) -> Result<(), LedgerError> {
        let cert = self.certificate(token_id)?;
        if cert.holder != ctx.caller && !self.authority.is_admin(ctx.caller) {
            return Err(LedgerError::Unauthorized(format!(
                "only the holder or issuer may burn {token_id}"
            )));
        }
        let mut status = cert.status;
        transition(&mut status, CertificateStatus::Burned, ctx.now)
            .map_err(|e| LedgerError::InvalidState(e.to_string()))?;
        let holder = cert.holder;
        let certificate_type = cert.certificate_type.clone();

        self.certificates.remove(&token_id);
        self.holder_tokens.remove(&holder, token_id);
        self.type_tokens.remove(certificate_type.as_str(), token_id);
        self.events.push(LedgerEvent::Burn { holder, token_id });
        Ok(())
    }

    // ── Soulbound ───────────────────────────────────────────────────

    /// Always fails.
    pub fn transfer_from(&self, _from: Address, _to: Address, _token_id: TokenId) -> Result<(), LedgerError> {
        Err(LedgerError::TransfersDisabled)
    }

    /// Always fails.
    pub fn safe_transfer_from(&self, _from: Address, _to: Address, _token_id: TokenId) -> Result<(), LedgerError> {
        Err(LedgerError::TransfersDisabled)
    }

    /// Always fails.
    pub fn approve(&self, _to: Address, _token_id: TokenId) -> Result<(), LedgerError> {
        Err(LedgerError::ApprovalsDisabled)
    }

    /// Always fails.
    pub fn set_approval_for_all(&self, _operator: Address, _approved: bool) -> Result<(), LedgerError> {
        Err(LedgerError::ApprovalsDisabled)
    }

    // ── Views ───────────────────────────────────────────────────────

    fn certificate(&self, token_id: TokenId) -> Result<&Certificate, LedgerError> {
        self.certificates
            .get(&token_id)
            .ok_or_else(|| LedgerError::NotFound(token_id.to_string()))
    }

    fn certificate_mut(&mut self, token_id: TokenId) -> Result<&mut Certificate, LedgerError> {
        self.certificates
            .get_mut(&token_id)
            .ok_or_else(|| LedgerError::NotFound(token_id.to_string()))
    }

    /// Full content. Issuer or holder only.
    pub fn get_certificate_details(&self, caller: Address, token_id: TokenId) -> Result<CertificateDetails, LedgerError> {
        let cert = self.certificate(token_id)?;
        if cert.holder != caller && !self.authority.is_admin(caller) {
            return Err(LedgerError::Unauthorized(format!(
                "only the holder or issuer may read {token_id}"
            )));
        }
        Ok(CertificateDetails {
            metadata_uri: cert.metadata_uri.clone(),
            issued_at: cert.issued_at,
            certificate_type: cert.certificate_type.clone(),
            subject_name: cert.subject_name.clone(),
            course_name: cert.course_name.clone(),
            grade: cert.grade.clone(),
            revoked: cert.is_revoked(),
        })
    }

    /// Public check of holder, type and validity.
    pub fn verify_certificate(&self, token_id: TokenId) -> Result<CertificateVerification, LedgerError> {
        let cert = self.certificate(token_id)?;
        Ok(CertificateVerification {
            holder: cert.holder,
            certificate_type: cert.certificate_type.clone(),
            valid: !cert.is_revoked(),
        })
    }

    /// Public check including subject fields.
    pub fn verify_certificate_detailed(&self, token_id: TokenId) -> Result<DetailedVerification, LedgerError> {
        let cert = self.certificate(token_id)?;
        Ok(DetailedVerification {
            holder: cert.holder,
            certificate_type: cert.certificate_type.clone(),
            subject_name: cert.subject_name.clone(),
            course_name: cert.course_name.clone(),
            issued_at: cert.issued_at,
            valid: !cert.is_revoked(),
        })
    }

    /// True iff the certificate exists and is not revoked.
    pub fn is_valid(&self, token_id: TokenId) -> bool {
        self.certificates
            .get(&token_id)
            .is_some_and(|c| !c.is_revoked())
    }

    /// Metadata URI. Blocked once revoked.
    pub fn token_uri(&self, token_id: TokenId) -> Result<&str, LedgerError> {
        let cert = self.certificate(token_id)?;
        if cert.is_revoked() {
            return Err(LedgerError::Revoked(token_id));
        }
        Ok(&cert.metadata_uri)
    }

    /// Certificates of `certificate_type`. Issuer only.
    pub fn get_certificates_by_type(&self, caller: Address, certificate_type: &str) -> Result<&[TokenId], LedgerError> {
        self.authority.require_admin(caller, "list certificates by type")?;
        Ok(self.type_tokens.get(certificate_type))
    }

    /// Holder of a live certificate.
    pub fn owner_of(&self, token_id: TokenId) -> Result<Address, LedgerError> {
        Ok(self.certificate(token_id)?.holder)
    }

    /// Live certificates held by `holder`.
    pub fn balance_of(&self, holder: Address) -> u64 {
        self.holder_tokens.count(&holder) as u64
    }

    /// Ids of live certificates held by `holder`, oldest first.
    pub fn tokens_of(&self, holder: Address) -> &[TokenId] {
        self.holder_tokens.get(&holder)
    }

    /// Certificates ever issued. Burning does not decrease it.
    pub fn total_supply(&self) -> u64 {
        self.total_issued
    }

    /// Always true for an existing certificate.
    pub fn is_permanent(&self, token_id: TokenId) -> Result<bool, LedgerError> {
        self.certificate(token_id).map(|_| true)
    }

    /// Always the zero address for an existing certificate.
    pub fn get_approved(&self, token_id: TokenId) -> Result<Address, LedgerError> {
        self.certificate(token_id).map(|_| Address::ZERO)
    }

    /// Always false.
    pub fn is_approved_for_all(&self, _holder: Address, _operator: Address) -> bool {
        false
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Collection symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// The issuer.
    pub fn owner(&self) -> Address {
        self.authority.admin()
    }

    /// Batch ceiling.
    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), LedgerError> {
    if expected == actual {
        Ok(())
    } else {
        Err(LedgerError::LengthMismatch { field, expected, actual })
    }
}

fn validate_item(item: &MintItem) -> Result<(), LedgerError> {
    if item.recipient.is_zero() {
        return Err(LedgerError::InvalidInput("recipient must be non-zero".into()));
    }
    require_non_empty("metadata URI", &item.metadata_uri)
}
