//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! forwarder. All types derive Serde traits for deserialization from config
//! files, and every field has a default so a minimal (or empty) config works.
//!
//! The upstream base URL is deliberately an `Option`: a deployment without
//! `SERVER_URL` still starts and serves, answering every request with a
//! structured 500 instead of guessing a default backend.

use serde::{Deserialize, Serialize};

/// Environment variable holding the upstream base URL.
pub const SERVER_URL_VAR: &str = "SERVER_URL";

/// Environment variable selecting the deployment environment.
pub const APP_ENV_VAR: &str = "APP_ENV";

/// Root configuration for the session forwarder.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream backend settings.
    pub upstream: UpstreamConfig,

    /// Deployment environment. Controls whether session cookies are
    /// rewritten for cross-site use.
    pub environment: Environment,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ForwarderConfig {
    /// Apply process-environment overrides.
    ///
    /// `SERVER_URL` sets the upstream base URL and `APP_ENV` the deployment
    /// environment. Values from the environment win over the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(SERVER_URL_VAR) {
            if !url.trim().is_empty() {
                self.upstream.base_url = Some(url);
            }
        }
        if let Ok(env) = std::env::var(APP_ENV_VAR) {
            self.environment = Environment::from_name(&env);
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the backend (e.g., "https://backend.example").
    ///
    /// `None` means the forwarder is misconfigured; every request fails
    /// closed with a 500 and no outbound call is made.
    pub base_url: Option<String>,

    /// Budget for a single upstream call in seconds. Expiry is treated as a
    /// transport error (502), never as a client-side timeout status.
    pub request_timeout_secs: u64,

    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Deployment environment.
///
/// Production deployments sit behind a serverless edge on a different origin
/// than the backend, so session cookies must be rewritten for cross-site
/// delivery. Development runs same-site over plain HTTP, where forcing
/// `Secure` would break the session entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Parse an environment name as found in `APP_ENV`.
    ///
    /// Anything not recognizably production is development; an unknown value
    /// must never switch on cross-site cookie rewriting.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// Whether the deployment is cross-site (serverless production).
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
