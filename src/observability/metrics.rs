//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwarder_requests_total` (counter): requests by method, status
//! - `forwarder_request_duration_seconds` (histogram): end-to-end latency
//!
//! # Design Decisions
//! - Recording is unconditional and cheap; without an installed recorder the
//!   macros are no-ops, so the handler never checks whether metrics are on
//! - Status labels include the forwarder's own 500/502 responses, making
//!   misconfiguration and upstream outages visible on the dashboard

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics recorder"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start_time: Instant) {
    metrics::counter!(
        "forwarder_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "forwarder_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start_time.elapsed().as_secs_f64());
}
