//! # Caller Authentication
//!
//! Every ledger operation acts on behalf of an address. Callers name it in
//! the `Authorization` header:
//!
//! ```text
//! Bearer {address}            when no AUTH_TOKEN is configured
//! Bearer {address}:{secret}   when AUTH_TOKEN is configured
//! ```
//!
//! The middleware parses the header and injects a [`Caller`] into the
//! request extensions. Handlers that mutate state or read caller-scoped
//! views take `Caller` as an extractor; public views do not.
//!
//! With a configured secret every `/v1` request must authenticate. Without
//! one, requests without a header pass through anonymously.

use axum::extract::Request;
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use subtle::ConstantTimeEq;

use hire_core::Address;

use crate::error::{AppError, ErrorBody, ErrorDetail};

/// The authenticated address behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Address);

impl<S: Send + Sync> axum::extract::FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .copied()
            .ok_or_else(|| AppError::Unauthorized("this operation requires a caller address".into()))
    }
}

/// Auth configuration injected into request extensions.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time comparison of shared secrets.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        // Dummy comparison to keep timing constant regardless of length match.
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Parse a bearer credential into a caller address.
pub fn parse_bearer_token(provided: &str, expected_secret: Option<&str>) -> Result<Caller, String> {
    let address = match expected_secret {
        Some(expected) => {
            let (address, secret) = provided
                .rsplit_once(':')
                .ok_or_else(|| "invalid token format, expected {address}:{secret}".to_string())?;
            if !constant_time_token_eq(secret, expected) {
                return Err("invalid bearer token".into());
            }
            address
        }
        None => provided,
    };
    let address: Address = address.parse().map_err(|e| format!("invalid caller address: {e}"))?;
    if address.is_zero() {
        return Err("the zero address cannot act".into());
    }
    Ok(Caller(address))
}

/// Authenticate the request and inject its [`Caller`].
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    match auth_header {
        Some(value) => {
            let Some(provided) = value.strip_prefix("Bearer ") else {
                tracing::warn!("authentication failed: non-Bearer authorization scheme");
                return unauthorized_response("authorization header must use Bearer scheme");
            };
            match parse_bearer_token(provided, expected.as_deref()) {
                Ok(caller) => {
                    request.extensions_mut().insert(caller);
                    next.run(request).await
                }
                Err(msg) => {
                    tracing::warn!(reason = %msg, "authentication failed");
                    unauthorized_response(&msg)
                }
            }
        }
        None if expected.is_some() => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
        None => next.run(request).await,
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app(token: Option<&str>) -> Router {
        Router::new()
            .route(
                "/whoami",
                get(|caller: Caller| async move { caller.0.to_string() }),
            )
            .route("/public", get(|| async { "ok" }))
            .layer(from_fn(auth_middleware))
            .layer(axum::Extension(AuthConfig {
                token: token.map(str::to_owned),
            }))
    }

    async fn call(app: Router, uri: &str, auth: Option<String>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri(uri);
        if let Some(auth) = auth {
            builder = builder.header("authorization", auth);
        }
        let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn parse_address_only_when_no_secret() {
        let alice = Address::derive("alice");
        assert_eq!(parse_bearer_token(&alice.to_string(), None), Ok(Caller(alice)));
        assert!(parse_bearer_token("not-an-address", None).is_err());
        assert!(parse_bearer_token(&Address::ZERO.to_string(), None).is_err());
    }

    #[test]
    fn parse_requires_matching_secret() {
        let alice = Address::derive("alice");
        assert_eq!(
            parse_bearer_token(&format!("{alice}:s3cret"), Some("s3cret")),
            Ok(Caller(alice))
        );
        assert!(parse_bearer_token(&format!("{alice}:wrong"), Some("s3cret")).is_err());
        assert!(parse_bearer_token(&alice.to_string(), Some("s3cret")).is_err());
    }

    #[test]
    fn constant_time_eq_behaviour() {
        assert!(constant_time_token_eq("abc", "abc"));
        assert!(!constant_time_token_eq("abc", "abd"));
        assert!(!constant_time_token_eq("abc", "abcd"));
    }

    #[tokio::test]
    async fn anonymous_requests_pass_without_secret() {
        let (status, body) = call(test_app(None), "/public", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
        let (status, _) = call(test_app(None), "/whoami", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn caller_is_injected() {
        let bob = Address::derive("bob");
        let (status, body) = call(test_app(Some("k")), "/whoami", Some(format!("Bearer {bob}:k"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, bob.to_string());
    }

    #[tokio::test]
    async fn secret_makes_header_mandatory() {
        let (status, body) = call(test_app(Some("k")), "/public", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("missing authorization header"));
        let (status, _) = call(test_app(Some("k")), "/public", Some("Basic abc".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
