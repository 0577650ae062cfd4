//! # Application State
//!
//! Shared state handed to every handler: the ledger service, the server
//! configuration and, when the binary installed one, the Prometheus
//! recorder handle used to render `/metrics`.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use hire_ledger::LedgerService;

/// Server configuration read from the environment.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Shared secret appended to bearer tokens.
    /// If `None`, callers identify by address alone.
    pub auth_token: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            auth_token: None,
        }
    }
}

/// State shared across handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LedgerService>,
    pub config: AppConfig,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(service: LedgerService, config: AppConfig) -> Self {
        Self {
            service: Arc::new(service),
            config,
            metrics: None,
        }
    }

    /// Attach the recorder handle rendered at `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("config", &self.config)
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}
