//! Session-forwarding proxy for a separately-deployed backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │              SESSION FORWARDER                │
//!                 │                                               │
//!   Client ───────┼─▶ wildcard route ──▶ target URL ──▶ client ──┼──▶ Backend
//!                 │    (any method)      (pass-through)  (hyper)  │    (SERVER_URL)
//!                 │                                               │
//!   Client ◀──────┼── Set-Cookie rewrite ◀── header strip ◀───────┼─── Backend
//!                 │    (SameSite=None;       (Content-Encoding)   │
//!                 │     Secure)                                   │
//!                 │                                               │
//!                 │  cross-cutting: config (file + env), tracing, │
//!                 │  request IDs, Prometheus metrics              │
//!                 └──────────────────────────────────────────────┘
//! ```
//!
//! The forwarder is stateless across requests: no cache, no retries, no
//! shared counters. Each inbound request maps to exactly one upstream
//! attempt, and failures collapse to a structured 500 (missing config) or
//! 502 (transport error).

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use session_forwarder::config::{load_config, validate_config, ForwarderConfig};
use session_forwarder::observability::metrics;
use session_forwarder::HttpServer;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "session-forwarder", version, about = "Session-forwarding proxy")]
struct Cli {
    /// Path to a TOML config file. Environment variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ForwarderConfig::default(),
    };
    config.apply_env_overrides();
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    // Initialize tracing subscriber
    let default_filter = format!(
        "session_forwarder={},tower_http=info",
        config.observability.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("session-forwarder v0.1.0 starting");

    if let Err(errors) = validate_config(&config) {
        let joined = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(format!("Invalid configuration: {joined}").into());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        environment = ?config.environment,
        upstream_configured = config.upstream.base_url.is_some(),
        request_timeout_secs = config.upstream.request_timeout_secs,
        "Configuration loaded"
    );

    if config.upstream.base_url.is_none() {
        // Fail closed per request, loudly at startup.
        tracing::warn!("SERVER_URL is not configured; every request will answer 500");
    }

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
