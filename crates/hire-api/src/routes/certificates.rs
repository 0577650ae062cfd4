//! # Certificates API
//!
//! Issuance, revocation and updates are issuer-only; burning is open to the
//! holder and the issuer. Verification endpoints are public. The transfer
//! and approval endpoints exist so wallets get a definite answer: they are
//! always rejected with 403.
//!
//! ## Endpoints
//!
//! - `POST /v1/certificates`: mint one certificate
//! - `POST /v1/certificates/batch`: mint with per-recipient details
//! - `POST /v1/certificates/batch/simple`: mint with URIs only
//! - `GET /v1/certificates?type=...`: token ids of a type (issuer only)
//! - `GET /v1/certificates/supply`: collection name, symbol and total issued
//! - `GET /v1/certificates/{id}`: full details (holder or issuer)
//! - `PUT /v1/certificates/{id}`: update subject, course and grade
//! - `DELETE /v1/certificates/{id}`: burn
//! - `POST /v1/certificates/{id}/revoke`: revoke
//! - `GET /v1/certificates/{id}/verify`: holder, type, validity
//! - `GET /v1/certificates/{id}/verify/detailed`: with subject fields
//! - `GET /v1/certificates/{id}/valid`: validity flag, false when missing
//! - `GET /v1/certificates/{id}/uri`: metadata URI, blocked once revoked
//! - `POST /v1/certificates/{id}/transfer`: always rejected
//! - `POST /v1/certificates/{id}/approve`: always rejected
//! - `GET /v1/holders/{address}/certificates`: live tokens of a holder

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use hire_core::{Address, TokenId};
use hire_ledger::{
    CertificateBatch, CertificateDetails, CertificateVerification, DetailedVerification, Receipt, Transaction,
};

use crate::auth::Caller;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::submit;
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MintRequest {
    pub recipient: Address,
    pub metadata_uri: String,
    pub certificate_type: String,
    #[serde(default)]
    pub subject_name: String,
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub grade: String,
}

#[derive(Debug, Deserialize)]
pub struct BatchMintRequest {
    pub certificate_type: String,
    #[serde(flatten)]
    pub batch: CertificateBatch,
}

#[derive(Debug, Deserialize)]
pub struct SimpleBatchMintRequest {
    pub certificate_type: String,
    pub recipients: Vec<Address>,
    pub metadata_uris: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCertificateRequest {
    pub subject_name: String,
    pub course_name: String,
    pub grade: String,
}

/// Transfer request. `from` defaults to the caller.
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from: Option<Address>,
    pub to: Address,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub to: Address,
}

#[derive(Debug, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub certificate_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SupplyResponse {
    pub name: String,
    pub symbol: String,
    pub total_supply: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidityResponse {
    pub token_id: TokenId,
    pub valid: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UriResponse {
    pub token_id: TokenId,
    pub uri: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HolderResponse {
    pub holder: Address,
    pub balance: u64,
    pub tokens: Vec<TokenId>,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/certificates", get(get_certificates_by_type).post(mint_certificate))
        .route("/v1/certificates/batch", post(batch_mint_certificates))
        .route("/v1/certificates/batch/simple", post(batch_mint_certificates_simple))
        .route("/v1/certificates/supply", get(get_supply))
        .route(
            "/v1/certificates/{id}",
            get(get_certificate_details)
                .put(update_certificate_details)
                .delete(burn_certificate),
        )
        .route("/v1/certificates/{id}/revoke", post(revoke_certificate))
        .route("/v1/certificates/{id}/verify", get(verify_certificate))
        .route("/v1/certificates/{id}/verify/detailed", get(verify_certificate_detailed))
        .route("/v1/certificates/{id}/valid", get(is_valid))
        .route("/v1/certificates/{id}/uri", get(token_uri))
        .route("/v1/certificates/{id}/transfer", post(transfer_certificate))
        .route("/v1/certificates/{id}/approve", post(approve))
        .route("/v1/holders/{address}/certificates", get(get_holder_certificates))
}

// ── Issuance ────────────────────────────────────────────────────────

async fn mint_certificate(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<MintRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Receipt>), AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::MintCertificate {
        recipient: req.recipient,
        metadata_uri: req.metadata_uri,
        certificate_type: req.certificate_type,
        subject_name: req.subject_name,
        course_name: req.course_name,
        grade: req.grade,
    };
    let receipt = submit(&state, caller, tx).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// POST /v1/certificates/batch: All-or-nothing.
async fn batch_mint_certificates(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<BatchMintRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Receipt>), AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::BatchMintCertificates {
        batch: req.batch,
        certificate_type: req.certificate_type,
    };
    let receipt = submit(&state, caller, tx).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn batch_mint_certificates_simple(
    State(state): State<AppState>,
    caller: Caller,
    body: Result<Json<SimpleBatchMintRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Receipt>), AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::BatchMintCertificatesSimple {
        recipients: req.recipients,
        metadata_uris: req.metadata_uris,
        certificate_type: req.certificate_type,
    };
    let receipt = submit(&state, caller, tx).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

// ── Lifecycle ───────────────────────────────────────────────────────

async fn update_certificate_details(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<UpdateCertificateRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::UpdateCertificateDetails {
        token_id: TokenId(id),
        subject_name: req.subject_name,
        course_name: req.course_name,
        grade: req.grade,
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn revoke_certificate(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
) -> Result<Json<Receipt>, AppError> {
    let tx = Transaction::RevokeCertificate { token_id: TokenId(id) };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn burn_certificate(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
) -> Result<Json<Receipt>, AppError> {
    let tx = Transaction::BurnCertificate { token_id: TokenId(id) };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn transfer_certificate(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<TransferRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::TransferFrom {
        from: req.from.unwrap_or(caller.0),
        to: req.to,
        token_id: TokenId(id),
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

async fn approve(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
    body: Result<Json<ApproveRequest>, JsonRejection>,
) -> Result<Json<Receipt>, AppError> {
    let req = extract_json(body)?;
    let tx = Transaction::Approve {
        to: req.to,
        token_id: TokenId(id),
    };
    Ok(Json(submit(&state, caller, tx).await?))
}

// ── Views ───────────────────────────────────────────────────────────

async fn get_certificates_by_type(
    State(state): State<AppState>,
    caller: Caller,
    Query(q): Query<TypeQuery>,
) -> Result<Json<Vec<TokenId>>, AppError> {
    let tokens = state.service.read(|l| {
        l.certificates
            .get_certificates_by_type(caller.0, &q.certificate_type)
            .map(<[TokenId]>::to_vec)
    })?;
    Ok(Json(tokens))
}

async fn get_supply(State(state): State<AppState>) -> Json<SupplyResponse> {
    Json(state.service.read(|l| SupplyResponse {
        name: l.certificates.name().to_string(),
        symbol: l.certificates.symbol().to_string(),
        total_supply: l.certificates.total_supply(),
    }))
}

async fn get_certificate_details(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<u64>,
) -> Result<Json<CertificateDetails>, AppError> {
    let details = state
        .service
        .read(|l| l.certificates.get_certificate_details(caller.0, TokenId(id)))?;
    Ok(Json(details))
}

async fn verify_certificate(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<CertificateVerification>, AppError> {
    Ok(Json(state.service.read(|l| l.certificates.verify_certificate(TokenId(id)))?))
}

async fn verify_certificate_detailed(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DetailedVerification>, AppError> {
    Ok(Json(
        state
            .service
            .read(|l| l.certificates.verify_certificate_detailed(TokenId(id)))?,
    ))
}

async fn is_valid(State(state): State<AppState>, Path(id): Path<u64>) -> Json<ValidityResponse> {
    let token_id = TokenId(id);
    let valid = state.service.read(|l| l.certificates.is_valid(token_id));
    Json(ValidityResponse { token_id, valid })
}

async fn token_uri(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Json<UriResponse>, AppError> {
    let token_id = TokenId(id);
    let uri = state
        .service
        .read(|l| l.certificates.token_uri(token_id).map(str::to_owned))?;
    Ok(Json(UriResponse { token_id, uri }))
}

async fn get_holder_certificates(State(state): State<AppState>, Path(holder): Path<Address>) -> Json<HolderResponse> {
    Json(state.service.read(|l| HolderResponse {
        holder,
        balance: l.certificates.balance_of(holder),
        tokens: l.certificates.tokens_of(holder).to_vec(),
    }))
}
