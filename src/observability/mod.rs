//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! forwarding handler produces:
//!     → tracing events (request id, method, target, status, latency)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → log aggregation (stdout)
//!     → metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The request ID generated at the edge is also sent upstream, so one ID
//!   correlates forwarder and backend logs
//! - Request/response bodies are never logged above debug level

pub mod metrics;
