//! # Transactions and the Combined Ledger
//!
//! [`Transaction`] is the closed command set of both registries. It is the
//! unit the service serializes, the journal records and replay re-executes.
//! [`Ledger`] routes each command to the registry that owns it.

use serde::{Deserialize, Serialize};

use hire_core::{Address, ApplicationId, JobId, LedgerError, Timestamp, TokenId, UserRole};

use crate::access::CallContext;
use crate::certificates::{CertificateBatch, CertificateLedger};
use crate::config::LedgerConfig;
use crate::events::LedgerEvent;
use crate::jobs::JobLedger;

/// A mutating ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Transaction {
    // Job ledger
    RegisterUser {
        name: String,
        email: String,
        role: UserRole,
    },
    UpdateProfile {
        name: String,
        email: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        profile_hash: Option<String>,
    },
    SetUserDetails {
        phone: String,
        profile_hash: String,
    },
    SetBackendAddress {
        address: Address,
    },
    RotateBackendAddress {
        address: Address,
    },
    MarkVerified {
        user: Address,
    },
    RemoveVerification {
        user: Address,
    },
    PostJob {
        title: String,
        description: String,
        deadline: Timestamp,
    },
    SetJobDetails {
        job_id: JobId,
        category: String,
        location: String,
        salary_range: String,
    },
    SetJobSkills {
        job_id: JobId,
        skills_required: String,
    },
    SetJobMoreDetails {
        job_id: JobId,
        salary_range: String,
        job_type: String,
        metadata_hash: String,
    },
    SetJobMetadata {
        job_id: JobId,
        metadata_hash: String,
    },
    UpdateJob {
        job_id: JobId,
        title: String,
        description: String,
    },
    UpdateJobSalary {
        job_id: JobId,
        salary_range: String,
    },
    CloseJob {
        job_id: JobId,
    },
    ApplyForJob {
        job_id: JobId,
    },
    SetApplicationDetails {
        application_id: ApplicationId,
        cover_letter: String,
        resume_hash: String,
    },
    SetApplicationExperience {
        application_id: ApplicationId,
        experience: String,
        current_position: String,
    },
    MarkApplicationReviewed {
        application_id: ApplicationId,
    },

    // Certificate ledger
    MintCertificate {
        recipient: Address,
        metadata_uri: String,
        certificate_type: String,
        #[serde(default)]
        subject_name: String,
        #[serde(default)]
        course_name: String,
        #[serde(default)]
        grade: String,
    },
    BatchMintCertificates {
        batch: CertificateBatch,
        certificate_type: String,
    },
    BatchMintCertificatesSimple {
        recipients: Vec<Address>,
        metadata_uris: Vec<String>,
        certificate_type: String,
    },
    RevokeCertificate {
        token_id: TokenId,
    },
    UpdateCertificateDetails {
        token_id: TokenId,
        subject_name: String,
        course_name: String,
        grade: String,
    },
    BurnCertificate {
        token_id: TokenId,
    },
    TransferFrom {
        from: Address,
        to: Address,
        token_id: TokenId,
    },
    SafeTransferFrom {
        from: Address,
        to: Address,
        token_id: TokenId,
    },
    Approve {
        to: Address,
        token_id: TokenId,
    },
    SetApprovalForAll {
        operator: Address,
        approved: bool,
    },
}

impl Transaction {
    /// snake_case operation name, identical to the serde tag.
    pub fn op(&self) -> &'static str {
        match self {
            Self::RegisterUser { .. } => "register_user",
            Self::UpdateProfile { .. } => "update_profile",
            Self::SetUserDetails { .. } => "set_user_details",
            Self::SetBackendAddress { .. } => "set_backend_address",
            Self::RotateBackendAddress { .. } => "rotate_backend_address",
            Self::MarkVerified { .. } => "mark_verified",
            Self::RemoveVerification { .. } => "remove_verification",
            Self::PostJob { .. } => "post_job",
            Self::SetJobDetails { .. } => "set_job_details",
            Self::SetJobSkills { .. } => "set_job_skills",
            Self::SetJobMoreDetails { .. } => "set_job_more_details",
            Self::SetJobMetadata { .. } => "set_job_metadata",
            Self::UpdateJob { .. } => "update_job",
            Self::UpdateJobSalary { .. } => "update_job_salary",
            Self::CloseJob { .. } => "close_job",
            Self::ApplyForJob { .. } => "apply_for_job",
            Self::SetApplicationDetails { .. } => "set_application_details",
            Self::SetApplicationExperience { .. } => "set_application_experience",
            Self::MarkApplicationReviewed { .. } => "mark_application_reviewed",
            Self::MintCertificate { .. } => "mint_certificate",
            Self::BatchMintCertificates { .. } => "batch_mint_certificates",
            Self::BatchMintCertificatesSimple { .. } => "batch_mint_certificates_simple",
            Self::RevokeCertificate { .. } => "revoke_certificate",
            Self::UpdateCertificateDetails { .. } => "update_certificate_details",
            Self::BurnCertificate { .. } => "burn_certificate",
            Self::TransferFrom { .. } => "transfer_from",
            Self::SafeTransferFrom { .. } => "safe_transfer_from",
            Self::Approve { .. } => "approve",
            Self::SetApprovalForAll { .. } => "set_approval_for_all",
        }
    }
}

/// Value produced by a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    Unit,
    Job(JobId),
    Application(ApplicationId),
    Token(TokenId),
    Tokens(Vec<TokenId>),
}

/// Both registries under one administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub jobs: JobLedger,
    pub certificates: CertificateLedger,
}

impl Ledger {
    /// Empty ledger from configuration.
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            jobs: JobLedger::new(config.admin, config.verifier),
            certificates: CertificateLedger::new(
                config.admin,
                config.certificates.name.clone(),
                config.certificates.symbol.clone(),
                config.certificates.max_batch_size,
            ),
        }
    }

    /// Execute one transaction. On error nothing changed.
    pub fn execute(&mut self, ctx: &CallContext, tx: Transaction) -> Result<Outcome, LedgerError> {
        use Transaction as T;
        let jobs = &mut self.jobs;
        let certs = &mut self.certificates;
        match tx {
            T::RegisterUser { name, email, role } => jobs.register_user(ctx, name, email, role).map(unit),
            T::UpdateProfile {
                name,
                email,
                phone,
                profile_hash,
            } => jobs.update_profile(ctx, name, email, phone, profile_hash).map(unit),
            T::SetUserDetails { phone, profile_hash } => jobs.set_user_details(ctx, phone, profile_hash).map(unit),
            T::SetBackendAddress { address } => jobs.set_backend_address(ctx, address).map(unit),
            T::RotateBackendAddress { address } => jobs.rotate_backend_address(ctx, address).map(unit),
            T::MarkVerified { user } => jobs.mark_verified(ctx, user).map(unit),
            T::RemoveVerification { user } => jobs.remove_verification(ctx, user).map(unit),
            T::PostJob {
                title,
                description,
                deadline,
            } => jobs.post_job(ctx, title, description, deadline).map(Outcome::Job),
            T::SetJobDetails {
                job_id,
                category,
                location,
                salary_range,
            } => jobs
                .set_job_details(ctx, job_id, category, location, salary_range)
                .map(unit),
            T::SetJobSkills { job_id, skills_required } => jobs.set_job_skills(ctx, job_id, skills_required).map(unit),
            T::SetJobMoreDetails {
                job_id,
                salary_range,
                job_type,
                metadata_hash,
            } => jobs
                .set_job_more_details(ctx, job_id, salary_range, job_type, metadata_hash)
                .map(unit),
            T::SetJobMetadata { job_id, metadata_hash } => jobs.set_job_metadata(ctx, job_id, metadata_hash).map(unit),
            T::UpdateJob {
                job_id,
                title,
                description,
            } => jobs.update_job(ctx, job_id, title, description).map(unit),
            T::UpdateJobSalary { job_id, salary_range } => jobs.update_job_salary(ctx, job_id, salary_range).map(unit),
            T::CloseJob { job_id } => jobs.close_job(ctx, job_id).map(unit),
            T::ApplyForJob { job_id } => jobs.apply_for_job(ctx, job_id).map(Outcome::Application),
            T::SetApplicationDetails {
                application_id,
                cover_letter,
                resume_hash,
            } => jobs
                .set_application_details(ctx, application_id, cover_letter, resume_hash)
                .map(unit),
            T::SetApplicationExperience {
                application_id,
                experience,
                current_position,
            } => jobs
                .set_application_experience(ctx, application_id, experience, current_position)
                .map(unit),
            T::MarkApplicationReviewed { application_id } => {
                jobs.mark_application_reviewed(ctx, application_id).map(unit)
            }
            T::MintCertificate {
                recipient,
                metadata_uri,
                certificate_type,
                subject_name,
                course_name,
                grade,
            } => certs
                .mint_certificate(ctx, recipient, metadata_uri, certificate_type, subject_name, course_name, grade)
                .map(Outcome::Token),
            T::BatchMintCertificates { batch, certificate_type } => certs
                .batch_mint_certificates(ctx, batch, certificate_type)
                .map(Outcome::Tokens),
            T::BatchMintCertificatesSimple {
                recipients,
                metadata_uris,
                certificate_type,
            } => certs
                .batch_mint_certificates_simple(ctx, recipients, metadata_uris, certificate_type)
                .map(Outcome::Tokens),
            T::RevokeCertificate { token_id } => certs.revoke_certificate(ctx, token_id).map(unit),
            T::UpdateCertificateDetails {
                token_id,
                subject_name,
                course_name,
                grade,
            } => certs
                .update_certificate_details(ctx, token_id, subject_name, course_name, grade)
                .map(unit),
            T::BurnCertificate { token_id } => certs.burn_certificate(ctx, token_id).map(unit),
            T::TransferFrom { from, to, token_id } => certs.transfer_from(from, to, token_id).map(unit),
            T::SafeTransferFrom { from, to, token_id } => certs.safe_transfer_from(from, to, token_id).map(unit),
            T::Approve { to, token_id } => certs.approve(to, token_id).map(unit),
            T::SetApprovalForAll { operator, approved } => certs.set_approval_for_all(operator, approved).map(unit),
        }
    }

    /// Events from both registries since the last drain, job events first.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        let mut events = self.jobs.drain_events();
        events.extend(self.certificates.drain_events());
        events
    }
}

fn unit(_: ()) -> Outcome {
    Outcome::Unit
}
