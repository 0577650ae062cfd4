//! # hire-api: Axum API Services for the Hiring Ledger
//!
//! HTTP surface over [`hire_ledger::LedgerService`]. Every mutating
//! endpoint becomes exactly one ledger transaction submitted as the
//! authenticated caller. Reads run against the latest committed state.
//!
//! ## API Surface
//!
//! | Prefix                  | Module                       | Domain              |
//! |-------------------------|------------------------------|---------------------|
//! | `/v1/users/*`           | [`routes::users`]            | Users, verification |
//! | `/v1/admin/*`           | [`routes::users`]            | Verifier address    |
//! | `/v1/jobs/*`, `/v1/stats` | [`routes::jobs`]           | Jobs                |
//! | `/v1/applications/*`    | [`routes::applications`]     | Applications        |
//! | `/v1/certificates/*`    | [`routes::certificates`]     | Certificates        |
//! | `/v1/holders/*`         | [`routes::certificates`]     | Certificate holders |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - Handlers never hold the ledger lock across an `.await`.
//! - Ledger rejections keep their machine code in the error body.
//! - Journal failures are logged, never echoed to clients.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;
use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes and `/metrics` are mounted outside the auth middleware
/// so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    // Authenticated API routes.
    let api = Router::new()
        .merge(routes::users::router())
        .merge(routes::jobs::router())
        .merge(routes::applications::router())
        .merge(routes::certificates::router())
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    // Unauthenticated probes.
    let ops = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/metrics", get(render_metrics))
        .with_state(state);

    Router::new().merge(ops).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 503 once a journal failure halted writes.
async fn readiness(State(state): State<AppState>) -> Response {
    if state.service.is_halted() {
        (StatusCode::SERVICE_UNAVAILABLE, "halted").into_response()
    } else {
        "ready".into_response()
    }
}

/// Prometheus text exposition, when a recorder is installed.
async fn render_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed").into_response(),
    }
}
