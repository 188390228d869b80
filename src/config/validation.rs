//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses are parseable and the upstream URL is well-formed
//! - Validate value ranges (timeouts > 0, body limit > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ForwarderConfig → Result<(), Vec<ValidationError>>
//! - A missing upstream URL is NOT a validation error; it is a representable
//!   runtime state that fails each request closed with a 500

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ForwarderConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BindAddress(String),

    #[error("upstream.base_url {0:?} is not a valid URL: {1}")]
    UpstreamUrl(String, url::ParseError),

    #[error("upstream.base_url {0:?} must use http or https")]
    UpstreamScheme(String),

    #[error("upstream.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("upstream.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    MetricsAddress(String),
}

/// Validate a configuration, collecting every problem.
pub fn validate_config(config: &ForwarderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Some(base_url) = &config.upstream.base_url {
        match Url::parse(base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(_) => errors.push(ValidationError::UpstreamScheme(base_url.clone())),
            Err(e) => errors.push(ValidationError::UpstreamUrl(base_url.clone(), e)),
        }
    }

    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if config.upstream.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
