//! # Request Metrics
//!
//! Counts requests by method, matched route and status class through the
//! `metrics` facade. Without an installed recorder the counters are no-ops.

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;

/// Middleware that increments `http_requests_total`.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;

    let class = format!("{}xx", response.status().as_u16() / 100);
    metrics::counter!("http_requests_total", "method" => method, "route" => route, "status" => class).increment(1);

    response
}
