//! # Jobs API
//!
//! Deadlines travel as Unix seconds.
//!
//! ## Endpoints
//!
//! - `POST /v1/jobs`: post a job (employer role)
//! - `GET /v1/jobs?category=...`: jobs in a category, in insertion order
//! - `GET /v1/jobs/active`: active job ids, ascending
//! - `GET /v1/jobs/{id}`: job record
//! - `GET /v1/jobs/{id}/complete`: job record with employer and application ids
//! - `PUT /v1/jobs/{id}`: update title and description
//! - `PUT /v1/jobs/{id}/details`: set category, location and salary range
//! - `PUT /v1/jobs/{id}/skills`: set the required skills
//! - `PUT /v1/jobs/{id}/more-details`: set salary range, job type and metadata hash
//! - `PUT /v1/jobs/{id}/metadata`: set the metadata hash
//! - `PUT /v1/jobs/{id}/salary`: update the salary range
//! - `POST /v1/jobs/{id}/close`: close the job
//! - `POST /v1/jobs/{id}/applications`: apply as the caller
//! - `GET /v1/jobs/{id}/applications`: application ids for a job
//! - `GET /v1/stats`: ledger counters

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use hire_core::{ApplicationId, JobId, Timestamp};
use hire_ledger::{CompleteJob, Job, LedgerStats, Receipt, Transaction};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::submit;
use crate::state::AppState;

// ── Request DTOs ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PostJobRequest {
    pub title: String,
    pub description: String,
    /// Unix seconds.
    pub deadline: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct JobDetailsRequest {
    pub category: String,
    pub location: String,
    pub salary_range: String,
}

#[derive(Debug, Deserialize)]
pub struct JobSkillsRequest {
    pub skills_required: String,
}

#[derive(Debug, Deserialize)]
pub struct JobMoreDetailsRequest {
    pub salary_range: String,
    pub job_type: String,
    pub metadata_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct JobMetadataRequest {
    pub metadata_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct JobSalaryRequest {
    pub salary_range: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub category: String,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/jobs", get(get_jobs_by_category).post(post_job))
        .route("/v1/jobs/active", get(get_active_jobs))
        .route("/v1/jobs/{id}", get(get_job).put(update_job))
        .route("/v1/jobs/{id}/complete", get(get_complete_job))
        .route("/v1/jobs/{id}/details", put(set_job_details))
        .route("/v1/jobs/{id}/skills", put(set_job_skills))
        .route("/v1/jobs/{id}/more-details", put(set_job_more_details))
        .route("/v1/jobs/{id}/metadata", put(set_job_metadata))
        .route("/v1/jobs/{id}/salary", put(update_job_salary))
        .route("/v1/jobs/{id}/close", post(close_job))
        .route(
            "/v1/jobs/{id}/applications",
            get(get_job_applications).post(apply_for_job),
        )
        .route("/v1/stats", get(get_contract_stats))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/jobs: Post a job as the caller.
async fn post_job(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<PostJobRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Receipt>), AppError> {
    let req = extract_json(body)?;
    let deadline = Timestamp::from_epoch_secs(req.deadline)?;
    let tx = Transaction::PostJob {
        title: req.title,
        description: req.description,
        deadline,
    };
    let receipt = submit(&state, caller, tx).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// GET /v1/jobs: Without `category`, lists the uncategorized bucket.
async fn get_jobs_by_category(State(state): State<AppState>, Query(q): Query<CategoryQuery>) -> Json<Vec<JobId>> {
    Json(state.service.read(|l| l.jobs.get_jobs_by_category(&q.category).to_vec()))
}

async fn get_active_jobs(State(state): State<AppState>) -> Json<Vec<JobId>> {
    Json(state.service.read(|l| l.jobs.get_active_jobs()))
}

async fn get_job(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<Job>, AppError> {
    let job = state.service.read(|l| l.jobs.get_job(JobId(id)).cloned())?;
    Ok(Json(job))
}

async fn get_complete_job(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CompleteJob>, AppError> {
    Ok(Json(state.service.read(|l| l.jobs.get_complete_job(JobId(id)))?))
}

async fn update_job(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<UpdateJobRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::UpdateJob {
        job_id: JobId(id),
        title: req.title,
        description: req.description,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn set_job_details(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<JobDetailsRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::SetJobDetails {
        job_id: JobId(id),
        category: req.category,
        location: req.location,
        salary_range: req.salary_range,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn set_job_skills(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<JobSkillsRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::SetJobSkills {
        job_id: JobId(id),
        skills_required: req.skills_required,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn set_job_more_details(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<JobMoreDetailsRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::SetJobMoreDetails {
        job_id: JobId(id),
        salary_range: req.salary_range,
        job_type: req.job_type,
        metadata_hash: req.metadata_hash,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn set_job_metadata(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<JobMetadataRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::SetJobMetadata {
        job_id: JobId(id),
        metadata_hash: req.metadata_hash,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn update_job_salary(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<JobSalaryRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::UpdateJobSalary {
        job_id: JobId(id),
        salary_range: req.salary_range,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn close_job(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
) -> Result<Json<Receipt>, AppError> {
    Ok(Json(
        submit(&state, caller, Transaction::CloseJob { job_id: JobId(id) }).await?,
    ))
}

/// POST /v1/jobs/{id}/applications: Apply as the caller.
async fn apply_for_job(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
) -> Result<(StatusCode, Json<Receipt>), AppError> {
    let receipt = submit(&state, caller, Transaction::ApplyForJob { job_id: JobId(id) }).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn get_job_applications(State(state): State<AppState>, Path(id): Path<u64>) -> Json<Vec<ApplicationId>> {
    Json(state.service.read(|l| l.jobs.get_job_applications(JobId(id)).to_vec()))
}

async fn get_contract_stats(State(state): State<AppState>) -> Json<LedgerStats> {
    Json(state.service.read(|l| l.jobs.get_contract_stats()))
}
