//! # Users API
//!
//! ## Endpoints
//!
//! - `POST /v1/users`: register the caller
//! - `GET /v1/users/{address}`: user record
//! - `PUT /v1/users/me/profile`: update the caller's name and email, optionally phone and profile hash
//! - `PUT /v1/users/me/details`: set the caller's phone and profile hash
//! - `GET /v1/users/{address}/jobs`: jobs posted by a user
//! - `GET /v1/users/{address}/applications`: applications by a user
//! - `GET /v1/users/{address}/verified`: verification flag
//! - `POST /v1/users/{address}/verification`: mark verified (verifier only)
//! - `DELETE /v1/users/{address}/verification`: remove verification (admin only)
//! - `PUT /v1/admin/backend`: set the verifier address once
//! - `POST /v1/admin/backend/rotate`: replace the verifier address

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use hire_core::{Address, ApplicationId, JobId, UserRole};
use hire_ledger::{Receipt, Transaction, User};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::submit;
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_hash: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserDetailsRequest {
    pub phone: String,
    pub profile_hash: String,
}

/// Body of the verifier-address endpoints.
#[derive(Debug, Deserialize)]
pub struct BackendAddressRequest {
    pub address: Address,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifiedResponse {
    pub address: Address,
    pub verified: bool,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/users", post(register_user))
        .route("/v1/users/me/profile", put(update_profile))
        .route("/v1/users/me/details", put(set_user_details))
        .route("/v1/users/{address}", get(get_user))
        .route("/v1/users/{address}/jobs", get(get_user_jobs))
        .route("/v1/users/{address}/applications", get(get_user_applications))
        .route("/v1/users/{address}/verified", get(is_user_verified))
        .route(
            "/v1/users/{address}/verification",
            post(mark_verified).delete(remove_verification),
        )
        .route("/v1/admin/backend", put(set_backend_address))
        .route("/v1/admin/backend/rotate", post(rotate_backend_address))
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /v1/users: Register the caller.
async fn register_user(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Receipt>), AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::RegisterUser {
        name: req.name,
        email: req.email,
        role: req.role,
    };
    let receipt = submit(&state, caller, tx).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn get_user(
    State(state): State<AppState>,
    Path(address): Path<Address>,
) -> Result<Json<User>, AppError> {
    let user = state.service.read(|l| l.jobs.get_user(address).cloned())?;
    Ok(Json(user))
}

async fn update_profile(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::UpdateProfile {
        name: req.name,
        email: req.email,
        phone: req.phone,
        profile_hash: req.profile_hash,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn set_user_details(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<UserDetailsRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::SetUserDetails {
        phone: req.phone,
        profile_hash: req.profile_hash,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn get_user_jobs(State(state): State<AppState>, Path(address): Path<Address>) -> Json<Vec<JobId>> {
    Json(state.service.read(|l| l.jobs.get_user_jobs(address).to_vec()))
}

async fn get_user_applications(
    State(state): State<AppState>,
    Path(address): Path<Address>,
) -> Json<Vec<ApplicationId>> {
    Json(state.service.read(|l| l.jobs.get_user_applications(address).to_vec()))
}

/// GET /v1/users/{address}/verified: false for unknown addresses.
async fn is_user_verified(State(state): State<AppState>, Path(address): Path<Address>) -> Json<VerifiedResponse> {
    let verified = state.service.read(|l| l.jobs.is_user_verified(address));
    Json(VerifiedResponse { address, verified })
}

async fn mark_verified(
    State(state): State<AppState>,
    caller: Caller,
    Path(user): Path<Address>,
) -> Result<Json<Receipt>, AppError> {
    Ok(Json(submit(&state, caller, Transaction::MarkVerified { user }).await?))
}

async fn remove_verification(
    State(state): State<AppState>,
    caller: Caller,
    Path(user): Path<Address>,
) -> Result<Json<Receipt>, AppError> {
    Ok(Json(
        submit(&state, caller, Transaction::RemoveVerification { user }).await?,
    ))
}

async fn set_backend_address(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<BackendAddressRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::SetBackendAddress { address: req.address };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn rotate_backend_address(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<BackendAddressRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::RotateBackendAddress { address: req.address };
    Ok(Json(submit(&state, caller, tx).await?))
}
