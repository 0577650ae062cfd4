//! # Applications API
//!
//! ## Endpoints
//!
//! - `GET /v1/applications/{id}`: application record
//! - `GET /v1/applications/{id}/complete`: application with its job title and employer
//! - `PUT /v1/applications/{id}/details`: cover letter and resume hash (applicant, once)
//! - `PUT /v1/applications/{id}/experience`: experience and current position (applicant, once)
//! - `POST /v1/applications/{id}/review`: mark reviewed (job's employer, once)

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use hire_core::ApplicationId;
use hire_ledger::{Application, CompleteApplication, Receipt, Transaction};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::submit;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ApplicationDetailsRequest {
    pub cover_letter: String,
    pub resume_hash: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationExperienceRequest {
    pub experience: String,
    pub current_position: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/applications/{id}", get(get_application))
        .route("/v1/applications/{id}/complete", get(get_complete_application))
        .route("/v1/applications/{id}/details", put(set_application_details))
        .route("/v1/applications/{id}/experience", put(set_application_experience))
        .route("/v1/applications/{id}/review", post(mark_application_reviewed))
}

async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Application>, AppError> {
    let application = state
        .service
        .read(|l| l.jobs.get_application(ApplicationId(id)).cloned())?;
    Ok(Json(application))
}

async fn set_application_details(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<ApplicationDetailsRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::SetApplicationDetails {
        application_id: ApplicationId(id),
        cover_letter: req.cover_letter,
        resume_hash: req.resume_hash,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn get_complete_application(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CompleteApplication>, AppError> {
    let complete = state
        .service
        .read(|l| l.jobs.get_complete_application(ApplicationId(id)))?;
    Ok(Json(complete))
}

async fn set_application_experience(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<ApplicationExperienceRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::SetApplicationExperience {
        application_id: ApplicationId(id),
        experience: req.experience,
        current_position: req.current_position,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn mark_application_reviewed(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
) -> Result<Json<Receipt>, AppError> {
    let tx = Transaction::MarkApplicationReviewed {
        application_id: ApplicationId(id),
    };
    Ok(Json(submit(&state, caller, tx).await?))
}
