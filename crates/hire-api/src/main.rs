//! # hire-api: Binary Entry Point
//!
//! Loads the ledger configuration named by `HIRE_LEDGER_CONFIG`, replays
//! its journal if one is configured, and serves the API on `PORT`
//! (default 8080).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;

use hire_api::state::{AppConfig, AppState};
use hire_core::SystemClock;
use hire_ledger::{LedgerConfig, LedgerService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let auth_token = std::env::var("AUTH_TOKEN").ok().filter(|t| !t.is_empty());
    let config = AppConfig { port, auth_token };

    let config_path: PathBuf = std::env::var("HIRE_LEDGER_CONFIG")
        .context("HIRE_LEDGER_CONFIG must name a ledger configuration file")?
        .into();
    let ledger_config = LedgerConfig::from_yaml_file(&config_path)?;
    let service = LedgerService::open(&ledger_config, Arc::new(SystemClock))
        .with_context(|| format!("opening ledger from {}", config_path.display()))?;
    tracing::info!(
        admin = %ledger_config.admin,
        journaled = service.is_journaled(),
        auth = config.auth_token.is_some(),
        "ledger ready"
    );

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .context("installing Prometheus recorder")?;
    let state = AppState::new(service, config).with_metrics(handle);
    let app = hire_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("hire API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Structured tracing. `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json") {
        builder.json().init();
    } else {
        builder.init();
    }
}
