//! # Job Ledger
//!
//! Users, jobs and applications. Primary records live in id-keyed arenas;
//! every secondary view (jobs per employer, applications per job and per
//! applicant, jobs per category, the active set, the duplicate-application
//! set) is an index updated by the same call that changes the record.
//!
//! ## Commit discipline
//!
//! Each operation runs all of its checks first and only then writes. A
//! returned error therefore means nothing changed.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use hire_core::{Address, ApplicationId, Capabilities, JobId, LedgerError, Timestamp, UserRole};
use hire_state::{transition, ApplicationStatus, JobStatus, TransitionRecord};

use crate::access::{require_non_empty, Authority, CallContext};
use crate::events::LedgerEvent;
use crate::index::Index;

// ─── Records ─────────────────────────────────────────────────────────

/// A registered participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub address: Address,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_hash: Option<String>,
    pub role: UserRole,
    pub total_jobs_posted: u64,
    pub total_applications: u64,
    pub registered_at: Timestamp,
    pub is_active: bool,
    pub is_verified: bool,
}

impl User {
    fn can(&self, capability: Capabilities) -> bool {
        self.role.capabilities().contains(capability)
    }
}

/// A job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub employer: Address,
    pub title: String,
    pub description: String,
    pub category: String,
    pub skills_required: String,
    pub location: String,
    pub salary_range: String,
    pub job_type: String,
    pub metadata_hash: String,
    pub applications_count: u64,
    pub created_at: Timestamp,
    pub deadline: Timestamp,
    pub status: JobStatus,
    pub history: Vec<TransitionRecord<JobStatus>>,
}

/// An application to a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub applicant: Address,
    pub cover_letter: String,
    pub resume_hash: String,
    pub details_set: bool,
    pub experience: String,
    pub current_position: String,
    pub experience_set: bool,
    pub applied_at: Timestamp,
    pub status: ApplicationStatus,
    pub history: Vec<TransitionRecord<ApplicationStatus>>,
}

/// A job with its employer and the applications it received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompleteJob {
    pub job: Job,
    pub employer_name: String,
    pub employer_verified: bool,
    pub applications: Vec<ApplicationId>,
}

/// An application with the job it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompleteApplication {
    pub application: Application,
    pub job_title: String,
    pub employer: Address,
    pub applicant_verified: bool,
}

/// Aggregate counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub total_jobs: u64,
    pub total_applications: u64,
    pub active_jobs: u64,
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// Registry of users, jobs and applications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLedger {
    authority: Authority,
    verifier: Option<Address>,
    users: HashMap<Address, User>,
    jobs: BTreeMap<JobId, Job>,
    applications: BTreeMap<ApplicationId, Application>,
    next_job: JobId,
    next_application: ApplicationId,
    user_jobs: Index<Address, JobId>,
    user_applications: Index<Address, ApplicationId>,
    job_applications: Index<JobId, ApplicationId>,
    jobs_by_category: Index<String, JobId>,
    active_jobs: BTreeSet<JobId>,
    applied: HashSet<(JobId, Address)>,
    events: Vec<LedgerEvent>,
}

impl JobLedger {
    /// Empty ledger administered by `admin`, optionally with a verifier
    /// already designated.
    pub fn new(admin: Address, verifier: Option<Address>) -> Self {
        Self {
            authority: Authority::new(admin),
            verifier: verifier.filter(|v| !v.is_zero()),
            users: HashMap::new(),
            jobs: BTreeMap::new(),
            applications: BTreeMap::new(),
            next_job: JobId::FIRST,
            next_application: ApplicationId::FIRST,
            user_jobs: Index::new(),
            user_applications: Index::new(),
            job_applications: Index::new(),
            jobs_by_category: Index::new(),
            active_jobs: BTreeSet::new(),
            applied: HashSet::new(),
            events: Vec::new(),
        }
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Administration ──────────────────────────────────────────────

    /// Designate the verifier. Only allowed while none is set.
    pub fn set_backend_address(&mut self, ctx: &CallContext, address: Address) -> Result<(), LedgerError> {
        self.authority.require_admin(ctx.caller, "set the backend address")?;
        if address.is_zero() {
            return Err(LedgerError::InvalidInput("backend address must be non-zero".into()));
        }
        if let Some(current) = self.verifier {
            return Err(LedgerError::InvalidState(format!(
                "backend address already set to {current}; use rotation"
            )));
        }
        self.verifier = Some(address);
        self.events.push(LedgerEvent::BackendAddressUpdated { old: None, new: address });
        Ok(())
    }

    /// Replace the verifier. Explicit, audited rotation.
    pub fn rotate_backend_address(&mut self, ctx: &CallContext, address: Address) -> Result<(), LedgerError> {
        self.authority.require_admin(ctx.caller, "rotate the backend address")?;
        if address.is_zero() {
            return Err(LedgerError::InvalidInput("backend address must be non-zero".into()));
        }
        let old = self.verifier.replace(address);
        self.events.push(LedgerEvent::BackendAddressUpdated { old, new: address });
        Ok(())
    }

    fn require_verifier(&self, caller: Address) -> Result<(), LedgerError> {
        match self.verifier {
            Some(v) if v == caller => Ok(()),
            _ => Err(LedgerError::Unauthorized(
                "only the backend verifier may change verification".into(),
            )),
        }
    }

    // ── Users ───────────────────────────────────────────────────────

    /// Create the caller's user record.
    pub fn register_user(
        &mut self,
        ctx: &CallContext,
        name: String,
        email: String,
        role: UserRole,
    ) -> Result<(), LedgerError> {
        require_non_empty("name", &name)?;
        require_non_empty("email", &email)?;
        if self.users.get(&ctx.caller).is_some_and(|u| u.is_active) {
            return Err(LedgerError::AlreadyRegistered(ctx.caller));
        }
        self.events.push(LedgerEvent::UserRegistered {
            user: ctx.caller,
            name: name.clone(),
            role,
        });
        self.users.insert(
            ctx.caller,
            User {
                address: ctx.caller,
                name,
                email,
                phone: None,
                profile_hash: None,
                role,
                total_jobs_posted: 0,
                total_applications: 0,
                registered_at: ctx.now,
                is_active: true,
                is_verified: false,
            },
        );
        Ok(())
    }

    /// Change the caller's name and email, and optionally phone and
    /// profile reference in the same call. `None` leaves a field as is.
    pub fn update_profile(
        &mut self,
        ctx: &CallContext,
        name: String,
        email: String,
        phone: Option<String>,
        profile_hash: Option<String>,
    ) -> Result<(), LedgerError> {
        self.active_user(ctx.caller)?;
        require_non_empty("name", &name)?;
        require_non_empty("email", &email)?;
        let user = self.active_user_mut(ctx.caller)?;
        user.name = name;
        user.email = email;
        if let Some(phone) = phone {
            user.phone = Some(phone).filter(|p| !p.is_empty());
        }
        if let Some(hash) = profile_hash {
            user.profile_hash = Some(hash).filter(|h| !h.is_empty());
        }
        self.events.push(LedgerEvent::UserProfileUpdated { user: ctx.caller });
        Ok(())
    }

    /// Set the caller's phone and profile reference.
    pub fn set_user_details(
        &mut self,
        ctx: &CallContext,
        phone: String,
        profile_hash: String,
    ) -> Result<(), LedgerError> {
        let user = self.active_user_mut(ctx.caller)?;
        user.phone = Some(phone).filter(|p| !p.is_empty());
        user.profile_hash = Some(profile_hash).filter(|h| !h.is_empty());
        self.events.push(LedgerEvent::UserProfileUpdated { user: ctx.caller });
        Ok(())
    }

    /// Set `address`'s verified flag. Verifier only; repeat calls succeed.
    pub fn mark_verified(&mut self, ctx: &CallContext, address: Address) -> Result<(), LedgerError> {
        self.set_verified(ctx, address, true)
    }

    /// Clear `address`'s verified flag. Verifier only; repeat calls succeed.
    pub fn remove_verification(&mut self, ctx: &CallContext, address: Address) -> Result<(), LedgerError> {
        self.set_verified(ctx, address, false)
    }

    fn set_verified(&mut self, ctx: &CallContext, address: Address, verified: bool) -> Result<(), LedgerError> {
        self.require_verifier(ctx.caller)?;
        let user = self
            .users
            .get_mut(&address)
            .ok_or_else(|| LedgerError::NotFound(format!("user {address}")))?;
        user.is_verified = verified;
        self.events.push(if verified {
            LedgerEvent::UserVerified { user: address }
        } else {
            LedgerEvent::VerificationRemoved { user: address }
        });
        Ok(())
    }

    fn active_user(&self, address: Address) -> Result<&User, LedgerError> {
        self.users
            .get(&address)
            .filter(|u| u.is_active)
            .ok_or(LedgerError::NotRegistered(address))
    }

    fn active_user_mut(&mut self, address: Address) -> Result<&mut User, LedgerError> {
        self.users
            .get_mut(&address)
            .filter(|u| u.is_active)
            .ok_or(LedgerError::NotRegistered(address))
    }

    // ── Jobs ────────────────────────────────────────────────────────

    /// Post a job. Returns its id.
    pub fn post_job(
        &mut self,
        ctx: &CallContext,
        title: String,
        description: String,
        deadline: Timestamp,
    ) -> Result<JobId, LedgerError> {
        let employer = self.active_user(ctx.caller)?;
        if !employer.can(Capabilities::CAN_POST) {
            return Err(LedgerError::Unauthorized(format!(
                "{} users cannot post jobs",
                employer.role
            )));
        }
        require_non_empty("title", &title)?;
        require_non_empty("description", &description)?;
        if deadline <= ctx.now {
            return Err(LedgerError::InvalidDeadline { deadline, now: ctx.now });
        }

        let id = self.next_job;
        self.next_job = id.next();
        self.events.push(LedgerEvent::JobPosted {
            job_id: id,
            employer: ctx.caller,
            title: title.clone(),
        });
        self.jobs.insert(
            id,
            Job {
                id,
                employer: ctx.caller,
                title,
                description,
                category: String::new(),
                skills_required: String::new(),
                location: String::new(),
                salary_range: String::new(),
                job_type: String::new(),
                metadata_hash: String::new(),
                applications_count: 0,
                created_at: ctx.now,
                deadline,
                status: JobStatus::Active,
                history: Vec::new(),
            },
        );
        self.index_new_job(ctx.caller, id);
        Ok(id)
    }

    /// Set category, location and salary. Moves the job between
    /// category buckets.
    pub fn set_job_details(
        &mut self,
        ctx: &CallContext,
        job_id: JobId,
        category: String,
        location: String,
        salary_range: String,
    ) -> Result<(), LedgerError> {
        let job = self.owned_open_job(ctx.caller, job_id)?;
        let previous = job.category.clone();
        if previous != category {
            self.reindex_category(job_id, &previous, &category);
        }
        let job = self.job_mut(job_id)?;
        job.category = category;
        job.location = location;
        job.salary_range = salary_range;
        Ok(())
    }

    /// Set the skills the job asks for.
    pub fn set_job_skills(&mut self, ctx: &CallContext, job_id: JobId, skills_required: String) -> Result<(), LedgerError> {
        self.owned_open_job(ctx.caller, job_id)?;
        self.job_mut(job_id)?.skills_required = skills_required;
        Ok(())
    }

    /// Set salary range, employment type and metadata reference together.
    pub fn set_job_more_details(
        &mut self,
        ctx: &CallContext,
        job_id: JobId,
        salary_range: String,
        job_type: String,
        metadata_hash: String,
    ) -> Result<(), LedgerError> {
        self.owned_open_job(ctx.caller, job_id)?;
        let job = self.job_mut(job_id)?;
        job.salary_range = salary_range;
        job.job_type = job_type;
        job.metadata_hash = metadata_hash;
        Ok(())
    }

    /// Set the job's metadata reference.
    pub fn set_job_metadata(&mut self, ctx: &CallContext, job_id: JobId, metadata_hash: String) -> Result<(), LedgerError> {
        self.owned_open_job(ctx.caller, job_id)?;
        self.job_mut(job_id)?.metadata_hash = metadata_hash;
        Ok(())
    }

    /// Change title and description.
    pub fn update_job(
        &mut self,
        ctx: &CallContext,
        job_id: JobId,
        title: String,
        description: String,
    ) -> Result<(), LedgerError> {
        self.owned_open_job(ctx.caller, job_id)?;
        require_non_empty("title", &title)?;
        require_non_empty("description", &description)?;
        self.events.push(LedgerEvent::JobUpdated {
            job_id,
            title: title.clone(),
        });
        let job = self.job_mut(job_id)?;
        job.title = title;
        job.description = description;
        Ok(())
    }

    /// Change the salary range.
    pub fn update_job_salary(&mut self, ctx: &CallContext, job_id: JobId, salary_range: String) -> Result<(), LedgerError> {
        self.owned_open_job(ctx.caller, job_id)?;
        self.job_mut(job_id)?.salary_range = salary_range;
        Ok(())
    }

    /// Close the job. One-way.
    pub fn close_job(&mut self, ctx: &CallContext, job_id: JobId) -> Result<(), LedgerError> {
        self.owned_job(ctx.caller, job_id)?;
        let job = self.job_mut(job_id)?;
        let record = transition(&mut job.status, JobStatus::Closed, ctx.now)
            .map_err(|e| LedgerError::InvalidState(e.to_string()))?;
        job.history.push(record);
        self.active_jobs.remove(&job_id);
        self.events.push(LedgerEvent::JobClosed { job_id });
        Ok(())
    }

    fn job(&self, job_id: JobId) -> Result<&Job, LedgerError> {
        self.jobs
            .get(&job_id)
            .ok_or_else(|| LedgerError::NotFound(job_id.to_string()))
    }

    fn job_mut(&mut self, job_id: JobId) -> Result<&mut Job, LedgerError> {
        self.jobs
            .get_mut(&job_id)
            .ok_or_else(|| LedgerError::NotFound(job_id.to_string()))
    }

    fn owned_job(&self, caller: Address, job_id: JobId) -> Result<&Job, LedgerError> {
        let job = self.job(job_id)?;
        if job.employer != caller {
            return Err(LedgerError::Unauthorized(format!(
                "only the employer of {job_id} may modify it"
            )));
        }
        Ok(job)
    }

    fn owned_open_job(&self, caller: Address, job_id: JobId) -> Result<&Job, LedgerError> {
        let job = self.owned_job(caller, job_id)?;
        if !job.status.is_active() {
            return Err(LedgerError::InvalidState(format!("{job_id} is closed")));
        }
        Ok(job)
    }

    fn index_new_job(&mut self, employer: Address, id: JobId) {
        self.user_jobs.insert(employer, id);
        self.jobs_by_category.insert(String::new(), id);
        self.active_jobs.insert(id);
        if let Some(user) = self.users.get_mut(&employer) {
            user.total_jobs_posted += 1;
        }
    }

    fn reindex_category(&mut self, id: JobId, from: &str, to: &str) {
        self.jobs_by_category.remove(from, id);
        self.jobs_by_category.insert(to.to_string(), id);
    }

    // ── Applications ────────────────────────────────────────────────

    /// Apply to a job. Returns the application id.
    pub fn apply_for_job(&mut self, ctx: &CallContext, job_id: JobId) -> Result<ApplicationId, LedgerError> {
        let applicant = self.active_user(ctx.caller)?;
        let job = self.job(job_id)?;
        if job.employer == ctx.caller {
            return Err(LedgerError::SelfApplicationForbidden(job_id));
        }
        if !applicant.can(Capabilities::CAN_APPLY) {
            return Err(LedgerError::Unauthorized(format!(
                "{} users cannot apply for jobs",
                applicant.role
            )));
        }
        if !job.status.is_active() {
            return Err(LedgerError::InvalidState(format!("{job_id} is closed")));
        }
        if ctx.now > job.deadline {
            return Err(LedgerError::Expired {
                job: job_id,
                deadline: job.deadline,
            });
        }
        if self.applied.contains(&(job_id, ctx.caller)) {
            return Err(LedgerError::DuplicateApplication {
                job: job_id,
                applicant: ctx.caller,
            });
        }

        let id = self.next_application;
        self.next_application = id.next();
        self.applications.insert(
            id,
            Application {
                id,
                job_id,
                applicant: ctx.caller,
                cover_letter: String::new(),
                resume_hash: String::new(),
                details_set: false,
                experience: String::new(),
                current_position: String::new(),
                experience_set: false,
                applied_at: ctx.now,
                status: ApplicationStatus::Pending,
                history: Vec::new(),
            },
        );
        self.index_new_application(job_id, ctx.caller, id);
        self.events.push(LedgerEvent::ApplicationSubmitted {
            application_id: id,
            job_id,
            applicant: ctx.caller,
        });
        Ok(id)
    }

    /// Attach cover letter and resume reference. Applicant only, once.
    pub fn set_application_details(
        &mut self,
        ctx: &CallContext,
        application_id: ApplicationId,
        cover_letter: String,
        resume_hash: String,
    ) -> Result<(), LedgerError> {
        let application = self.application_mut(application_id)?;
        if application.applicant != ctx.caller {
            return Err(LedgerError::Unauthorized(format!(
                "only the applicant may edit {application_id}"
            )));
        }
        if application.details_set {
            return Err(LedgerError::InvalidState(format!(
                "details of {application_id} are already set"
            )));
        }
        application.cover_letter = cover_letter;
        application.resume_hash = resume_hash;
        application.details_set = true;
        Ok(())
    }

    /// Attach work experience and current position. Applicant only, once.
    pub fn set_application_experience(
        &mut self,
        ctx: &CallContext,
        application_id: ApplicationId,
        experience: String,
        current_position: String,
    ) -> Result<(), LedgerError> {
        let application = self.application_mut(application_id)?;
        if application.applicant != ctx.caller {
            return Err(LedgerError::Unauthorized(format!(
                "only the applicant may edit {application_id}"
            )));
        }
        if application.experience_set {
            return Err(LedgerError::InvalidState(format!(
                "experience of {application_id} is already set"
            )));
        }
        application.experience = experience;
        application.current_position = current_position;
        application.experience_set = true;
        Ok(())
    }

    /// Mark an application reviewed. Job employer only, once.
    pub fn mark_application_reviewed(
        &mut self,
        ctx: &CallContext,
        application_id: ApplicationId,
    ) -> Result<(), LedgerError> {
        let job_id = self.application(application_id)?.job_id;
        if self.job(job_id)?.employer != ctx.caller {
            return Err(LedgerError::Unauthorized(format!(
                "only the employer of {job_id} may review {application_id}"
            )));
        }
        let application = self.application_mut(application_id)?;
        let record = transition(&mut application.status, ApplicationStatus::Reviewed, ctx.now)
            .map_err(|_| LedgerError::AlreadyReviewed(application_id))?;
        application.history.push(record);
        self.events.push(LedgerEvent::ApplicationReviewed {
            application_id,
            job_id,
        });
        Ok(())
    }

    fn application(&self, id: ApplicationId) -> Result<&Application, LedgerError> {
        self.applications
            .get(&id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    fn application_mut(&mut self, id: ApplicationId) -> Result<&mut Application, LedgerError> {
        self.applications
            .get_mut(&id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))
    }

    fn index_new_application(&mut self, job_id: JobId, applicant: Address, id: ApplicationId) {
        self.job_applications.insert(job_id, id);
        self.user_applications.insert(applicant, id);
        self.applied.insert((job_id, applicant));
        if let Some(job) = self.jobs.get_mut(&job_id) {
            job.applications_count += 1;
        }
        if let Some(user) = self.users.get_mut(&applicant) {
            user.total_applications += 1;
        }
    }

    // ── Views ───────────────────────────────────────────────────────

    /// The administrator.
    pub fn owner(&self) -> Address {
        self.authority.admin()
    }

    /// The designated verifier, if any.
    pub fn backend_address(&self) -> Option<Address> {
        self.verifier
    }

    /// A user record.
    pub fn get_user(&self, address: Address) -> Result<&User, LedgerError> {
        self.users
            .get(&address)
            .ok_or_else(|| LedgerError::NotFound(format!("user {address}")))
    }

    /// A job record.
    pub fn get_job(&self, job_id: JobId) -> Result<&Job, LedgerError> {
        self.job(job_id)
    }

    /// An application record.
    pub fn get_application(&self, id: ApplicationId) -> Result<&Application, LedgerError> {
        self.application(id)
    }

    /// A job together with its employer and application ids.
    pub fn get_complete_job(&self, job_id: JobId) -> Result<CompleteJob, LedgerError> {
        let job = self.job(job_id)?;
        let employer = self.get_user(job.employer)?;
        Ok(CompleteJob {
            job: job.clone(),
            employer_name: employer.name.clone(),
            employer_verified: employer.is_verified,
            applications: self.job_applications.get(&job_id).to_vec(),
        })
    }

    /// An application together with the job it targets.
    pub fn get_complete_application(&self, id: ApplicationId) -> Result<CompleteApplication, LedgerError> {
        let application = self.application(id)?;
        let job = self.job(application.job_id)?;
        Ok(CompleteApplication {
            application: application.clone(),
            job_title: job.title.clone(),
            employer: job.employer,
            applicant_verified: self.is_user_verified(application.applicant),
        })
    }

    /// Jobs posted by `address`, oldest first.
    pub fn get_user_jobs(&self, address: Address) -> &[JobId] {
        self.user_jobs.get(&address)
    }

    /// Applications submitted by `address`, oldest first.
    pub fn get_user_applications(&self, address: Address) -> &[ApplicationId] {
        self.user_applications.get(&address)
    }

    /// Applications to `job_id`, oldest first.
    pub fn get_job_applications(&self, job_id: JobId) -> &[ApplicationId] {
        self.job_applications.get(&job_id)
    }

    /// Active job ids, ascending.
    pub fn get_active_jobs(&self) -> Vec<JobId> {
        self.active_jobs.iter().copied().collect()
    }

    /// Jobs in `category` in the order they entered it. Includes closed jobs.
    pub fn get_jobs_by_category(&self, category: &str) -> &[JobId] {
        self.jobs_by_category.get(category)
    }

    /// Whether `address` is registered and verified.
    pub fn is_user_verified(&self, address: Address) -> bool {
        self.users.get(&address).is_some_and(|u| u.is_verified)
    }

    /// Totals across the ledger.
    pub fn get_contract_stats(&self) -> LedgerStats {
        LedgerStats {
            total_jobs: self.jobs.len() as u64,
            total_applications: self.applications.len() as u64,
            active_jobs: self.active_jobs.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::parse("2026-02-01T09:00:00Z").unwrap()
    }

    fn ctx(label: &str) -> CallContext {
        CallContext::new(Address::derive(label), now())
    }

    fn ledger() -> JobLedger {
        let mut ledger = JobLedger::new(Address::derive("admin"), None);
        ledger
            .register_user(&ctx("alice"), "Alice".into(), "alice@example.com".into(), UserRole::JobSeeker)
            .unwrap();
        ledger
            .register_user(&ctx("bob"), "Bob".into(), "bob@example.com".into(), UserRole::Employer)
            .unwrap();
        ledger
            .register_user(&ctx("dana"), "Dana".into(), "dana@example.com".into(), UserRole::Both)
            .unwrap();
        ledger.drain_events();
        ledger
    }

    fn post(ledger: &mut JobLedger, who: &str) -> JobId {
        ledger
            .post_job(&ctx(who), "Engineer".into(), "Build things".into(), now().plus_secs(86_400))
            .unwrap()
    }

    #[test]
    fn test_register_rejects_empty_and_duplicates() {
        let mut ledger = ledger();
        let carol = ctx("carol");
        assert!(matches!(
            ledger.register_user(&carol, String::new(), "c@x".into(), UserRole::JobSeeker),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.register_user(&carol, "Carol".into(), String::new(), UserRole::JobSeeker),
            Err(LedgerError::InvalidInput(_))
        ));
        assert_eq!(
            ledger.register_user(&ctx("alice"), "A".into(), "a@x".into(), UserRole::Both),
            Err(LedgerError::AlreadyRegistered(Address::derive("alice")))
        );
        assert_eq!(ledger.get_user(Address::derive("alice")).unwrap().role, UserRole::JobSeeker);
    }

    #[test]
    fn test_profile_updates_require_registration() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.update_profile(&ctx("zed"), "Z".into(), "z@x".into(), None, None),
            Err(LedgerError::NotRegistered(Address::derive("zed")))
        );
        assert_eq!(
            ledger.set_user_details(&ctx("zed"), "1".into(), "h".into()),
            Err(LedgerError::NotRegistered(Address::derive("zed")))
        );
        ledger
            .set_user_details(&ctx("alice"), "555-0100".into(), "ipfs://cv".into())
            .unwrap();
        ledger
            .update_profile(&ctx("alice"), "Alice B".into(), "ab@example.com".into(), None, None)
            .unwrap();
        let alice = ledger.get_user(Address::derive("alice")).unwrap();
        assert_eq!(alice.name, "Alice B");
        assert_eq!(alice.phone.as_deref(), Some("555-0100"));
        assert_eq!(alice.profile_hash.as_deref(), Some("ipfs://cv"));
        let updated = LedgerEvent::UserProfileUpdated { user: Address::derive("alice") };
        assert_eq!(ledger.drain_events(), vec![updated.clone(), updated]);
    }

    #[test]
    fn test_update_profile_sets_all_four_fields() {
        let mut ledger = ledger();
        ledger
            .update_profile(
                &ctx("alice"),
                "Alice Updated".into(),
                "alice.new@example.com".into(),
                Some("+1234567890".into()),
                Some("QmNewProfileHash456".into()),
            )
            .unwrap();
        let alice = ledger.get_user(Address::derive("alice")).unwrap();
        assert_eq!(alice.name, "Alice Updated");
        assert_eq!(alice.email, "alice.new@example.com");
        assert_eq!(alice.phone.as_deref(), Some("+1234567890"));
        assert_eq!(alice.profile_hash.as_deref(), Some("QmNewProfileHash456"));
    }

    #[test]
    fn test_update_profile_rejects_empty_name_or_email() {
        let mut ledger = ledger();
        let before = ledger.clone();
        assert!(matches!(
            ledger.update_profile(&ctx("alice"), String::new(), "a@x".into(), Some("1".into()), None),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.update_profile(&ctx("alice"), "Alice".into(), String::new(), None, Some("h".into())),
            Err(LedgerError::InvalidInput(_))
        ));
        assert_eq!(ledger, before);
        assert!(ledger.drain_events().is_empty());
        let alice = ledger.get_user(Address::derive("alice")).unwrap();
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.email, "alice@example.com");
        assert_eq!(alice.phone, None);
    }

    #[test]
    fn test_backend_address_set_once_then_rotate() {
        let mut ledger = ledger();
        let admin = ctx("admin");
        let relay = Address::derive("relay");
        assert!(matches!(
            ledger.set_backend_address(&ctx("bob"), relay),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.set_backend_address(&admin, Address::ZERO),
            Err(LedgerError::InvalidInput(_))
        ));
        ledger.set_backend_address(&admin, relay).unwrap();
        assert!(matches!(
            ledger.set_backend_address(&admin, Address::derive("other")),
            Err(LedgerError::InvalidState(_))
        ));
        let next = Address::derive("relay-2");
        ledger.rotate_backend_address(&admin, next).unwrap();
        assert_eq!(ledger.backend_address(), Some(next));
        assert_eq!(
            ledger.drain_events(),
            vec![
                LedgerEvent::BackendAddressUpdated { old: None, new: relay },
                LedgerEvent::BackendAddressUpdated { old: Some(relay), new: next },
            ]
        );
    }

    #[test]
    fn test_verification_is_verifier_only_and_idempotent() {
        let mut ledger = JobLedger::new(Address::derive("admin"), Some(Address::derive("relay")));
        ledger
            .register_user(&ctx("alice"), "Alice".into(), "a@x".into(), UserRole::JobSeeker)
            .unwrap();
        ledger.drain_events();
        let alice = Address::derive("alice");
        assert!(matches!(
            ledger.mark_verified(&ctx("admin"), alice),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.mark_verified(&ctx("relay"), Address::derive("nobody")),
            Err(LedgerError::NotFound(_))
        ));
        ledger.mark_verified(&ctx("relay"), alice).unwrap();
        ledger.mark_verified(&ctx("relay"), alice).unwrap();
        assert!(ledger.is_user_verified(alice));
        ledger.remove_verification(&ctx("relay"), alice).unwrap();
        assert!(!ledger.is_user_verified(alice));
        assert_eq!(ledger.drain_events().len(), 3);
    }

    #[test]
    fn test_post_job_checks() {
        let mut ledger = ledger();
        assert!(matches!(
            ledger.post_job(&ctx("alice"), "T".into(), "D".into(), now().plus_secs(10)),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.post_job(&ctx("bob"), String::new(), "D".into(), now().plus_secs(10)),
            Err(LedgerError::InvalidInput(_))
        ));
        assert!(matches!(
            ledger.post_job(&ctx("bob"), "T".into(), "D".into(), now()),
            Err(LedgerError::InvalidDeadline { .. })
        ));
        let id = post(&mut ledger, "bob");
        assert_eq!(id, JobId(1));
        assert_eq!(ledger.get_user_jobs(Address::derive("bob")), &[JobId(1)]);
        assert_eq!(ledger.get_active_jobs(), vec![JobId(1)]);
        assert_eq!(ledger.get_user(Address::derive("bob")).unwrap().total_jobs_posted, 1);
    }

    #[test]
    fn test_job_mutations_owner_only_and_blocked_when_closed() {
        let mut ledger = ledger();
        let id = post(&mut ledger, "bob");
        assert!(matches!(
            ledger.update_job_salary(&ctx("dana"), id, "1".into()),
            Err(LedgerError::Unauthorized(_))
        ));
        assert!(matches!(
            ledger.set_job_metadata(&ctx("bob"), JobId(9), "h".into()),
            Err(LedgerError::NotFound(_))
        ));
        ledger
            .update_job(&ctx("bob"), id, "Senior Engineer".into(), "Lead".into())
            .unwrap();
        ledger.close_job(&ctx("bob"), id).unwrap();
        assert!(matches!(
            ledger.update_job(&ctx("bob"), id, "X".into(), "Y".into()),
            Err(LedgerError::InvalidState(_))
        ));
        assert!(matches!(
            ledger.close_job(&ctx("bob"), id),
            Err(LedgerError::InvalidState(_))
        ));
        let job = ledger.get_job(id).unwrap();
        assert_eq!(job.title, "Senior Engineer");
        assert_eq!(job.history.len(), 1);
        assert!(ledger.get_active_jobs().is_empty());
    }

    #[test]
    fn test_skills_and_more_details() {
        let mut ledger = ledger();
        let id = post(&mut ledger, "bob");
        assert!(matches!(
            ledger.set_job_skills(&ctx("dana"), id, "Rust".into()),
            Err(LedgerError::Unauthorized(_))
        ));
        ledger
            .set_job_skills(&ctx("bob"), id, "JavaScript, React, Node.js".into())
            .unwrap();
        ledger
            .set_job_more_details(
                &ctx("bob"),
                id,
                "$80,000 - $120,000".into(),
                "Full-time".into(),
                "QmJobMetadataHash123".into(),
            )
            .unwrap();
        let job = ledger.get_job(id).unwrap();
        assert_eq!(job.skills_required, "JavaScript, React, Node.js");
        assert_eq!(job.salary_range, "$80,000 - $120,000");
        assert_eq!(job.job_type, "Full-time");
        assert_eq!(job.metadata_hash, "QmJobMetadataHash123");

        ledger.close_job(&ctx("bob"), id).unwrap();
        assert!(matches!(
            ledger.set_job_more_details(&ctx("bob"), id, "1".into(), "Part-time".into(), "h".into()),
            Err(LedgerError::InvalidState(_))
        ));
        assert!(matches!(
            ledger.set_job_skills(&ctx("bob"), id, "Go".into()),
            Err(LedgerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_complete_views() {
        let mut ledger = ledger();
        let job = post(&mut ledger, "bob");
        ledger.set_job_skills(&ctx("bob"), job, "React, Node.js".into()).unwrap();
        let app = ledger.apply_for_job(&ctx("alice"), job).unwrap();
        ledger
            .set_application_details(&ctx("alice"), app, "Cover letter".into(), "QmResumeHash".into())
            .unwrap();
        ledger
            .set_application_experience(&ctx("alice"), app, "5 years".into(), "Senior Dev".into())
            .unwrap();

        let complete = ledger.get_complete_job(job).unwrap();
        assert_eq!(complete.job.title, "Engineer");
        assert_eq!(complete.job.skills_required, "React, Node.js");
        assert_eq!(complete.employer_name, "Bob");
        assert!(!complete.employer_verified);
        assert_eq!(complete.applications, vec![app]);

        let complete = ledger.get_complete_application(app).unwrap();
        assert_eq!(complete.application.applicant, Address::derive("alice"));
        assert_eq!(complete.application.cover_letter, "Cover letter");
        assert_eq!(complete.application.experience, "5 years");
        assert_eq!(complete.job_title, "Engineer");
        assert_eq!(complete.employer, Address::derive("bob"));

        assert!(matches!(ledger.get_complete_job(JobId(9)), Err(LedgerError::NotFound(_))));
        assert!(matches!(
            ledger.get_complete_application(ApplicationId(9)),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_category_buckets_follow_details() {
        let mut ledger = ledger();
        let first = post(&mut ledger, "bob");
        let second = post(&mut ledger, "dana");
        for id in [first, second] {
            let owner = if id == first { "bob" } else { "dana" };
            ledger
                .set_job_details(&ctx(owner), id, "engineering".into(), "Remote".into(), "100k".into())
                .unwrap();
        }
        assert_eq!(ledger.get_jobs_by_category("engineering"), &[first, second]);
        ledger
            .set_job_details(&ctx("bob"), first, "design".into(), "Remote".into(), "90k".into())
            .unwrap();
        assert_eq!(ledger.get_jobs_by_category("engineering"), &[second]);
        assert_eq!(ledger.get_jobs_by_category("design"), &[first]);
        ledger.close_job(&ctx("bob"), first).unwrap();
        assert_eq!(ledger.get_jobs_by_category("design"), &[first]);
    }

    #[test]
    fn test_apply_check_order() {
        let mut ledger = ledger();
        let id = post(&mut ledger, "bob");
        assert_eq!(
            ledger.apply_for_job(&ctx("zed"), id),
            Err(LedgerError::NotRegistered(Address::derive("zed")))
        );
        assert!(matches!(
            ledger.apply_for_job(&ctx("alice"), JobId(42)),
            Err(LedgerError::NotFound(_))
        ));
        assert_eq!(
            ledger.apply_for_job(&ctx("bob"), id),
            Err(LedgerError::SelfApplicationForbidden(id))
        );
        ledger
            .register_user(&ctx("erin"), "Erin".into(), "e@x".into(), UserRole::Employer)
            .unwrap();
        assert!(matches!(
            ledger.apply_for_job(&ctx("erin"), id),
            Err(LedgerError::Unauthorized(_))
        ));
        let app = ledger.apply_for_job(&ctx("alice"), id).unwrap();
        assert_eq!(app, ApplicationId(1));
        assert_eq!(
            ledger.apply_for_job(&ctx("alice"), id),
            Err(LedgerError::DuplicateApplication {
                job: id,
                applicant: Address::derive("alice")
            })
        );
        assert_eq!(ledger.get_job(id).unwrap().applications_count, 1);
        assert_eq!(ledger.get_job_applications(id), &[app]);
        assert_eq!(ledger.get_user_applications(Address::derive("alice")), &[app]);
    }

    #[test]
    fn test_apply_deadline_is_inclusive() {
        let mut ledger = ledger();
        let id = post(&mut ledger, "bob");
        let at_deadline = CallContext::new(Address::derive("alice"), now().plus_secs(86_400));
        assert!(ledger.apply_for_job(&at_deadline, id).is_ok());
        let late = CallContext::new(Address::derive("dana"), now().plus_secs(86_401));
        assert!(matches!(
            ledger.apply_for_job(&late, id),
            Err(LedgerError::Expired { .. })
        ));
    }

    #[test]
    fn test_apply_to_closed_job() {
        let mut ledger = ledger();
        let id = post(&mut ledger, "bob");
        ledger.close_job(&ctx("bob"), id).unwrap();
        assert!(matches!(
            ledger.apply_for_job(&ctx("alice"), id),
            Err(LedgerError::InvalidState(_))
        ));
    }

    #[test]
    fn test_application_details_once_and_review_once() {
        let mut ledger = ledger();
        let job = post(&mut ledger, "bob");
        let app = ledger.apply_for_job(&ctx("alice"), job).unwrap();
        assert!(matches!(
            ledger.set_application_details(&ctx("dana"), app, "hi".into(), "cv".into()),
            Err(LedgerError::Unauthorized(_))
        ));
        ledger
            .set_application_details(&ctx("alice"), app, "hi".into(), "cv".into())
            .unwrap();
        assert!(matches!(
            ledger.set_application_details(&ctx("alice"), app, "again".into(), "cv2".into()),
            Err(LedgerError::InvalidState(_))
        ));
        assert!(matches!(
            ledger.mark_application_reviewed(&ctx("alice"), app),
            Err(LedgerError::Unauthorized(_))
        ));
        ledger.mark_application_reviewed(&ctx("bob"), app).unwrap();
        assert_eq!(
            ledger.mark_application_reviewed(&ctx("bob"), app),
            Err(LedgerError::AlreadyReviewed(app))
        );
        let record = ledger.get_application(app).unwrap();
        assert_eq!(record.status, ApplicationStatus::Reviewed);
        assert_eq!(record.cover_letter, "hi");
    }

    #[test]
    fn test_application_experience_applicant_only_once() {
        let mut ledger = ledger();
        let job = post(&mut ledger, "bob");
        let app = ledger.apply_for_job(&ctx("alice"), job).unwrap();
        assert!(matches!(
            ledger.set_application_experience(&ctx("bob"), app, "x".into(), "y".into()),
            Err(LedgerError::Unauthorized(_))
        ));
        ledger
            .set_application_experience(
                &ctx("alice"),
                app,
                "5 years in software development".into(),
                "Senior Developer at TechCorp".into(),
            )
            .unwrap();
        assert!(matches!(
            ledger.set_application_experience(&ctx("alice"), app, "6 years".into(), "Lead".into()),
            Err(LedgerError::InvalidState(_))
        ));
        assert!(matches!(
            ledger.set_application_experience(&ctx("alice"), ApplicationId(7), "x".into(), "y".into()),
            Err(LedgerError::NotFound(_))
        ));
        let record = ledger.get_application(app).unwrap();
        assert_eq!(record.experience, "5 years in software development");
        assert_eq!(record.current_position, "Senior Developer at TechCorp");
        assert!(!record.details_set);
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let mut ledger = ledger();
        let job = post(&mut ledger, "bob");
        ledger.drain_events();
        let before = ledger.clone();
        let _ = ledger.apply_for_job(&ctx("bob"), job);
        let _ = ledger.update_job(&ctx("bob"), job, String::new(), "x".into());
        let _ = ledger.close_job(&ctx("alice"), job);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_stats() {
        let mut ledger = ledger();
        let a = post(&mut ledger, "bob");
        let _b = post(&mut ledger, "bob");
        ledger.apply_for_job(&ctx("alice"), a).unwrap();
        ledger.close_job(&ctx("bob"), a).unwrap();
        assert_eq!(
            ledger.get_contract_stats(),
            LedgerStats {
                total_jobs: 2,
                total_applications: 1,
                active_jobs: 1
            }
        );
    }
}
