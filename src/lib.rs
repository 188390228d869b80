//! Session-forwarding proxy library.
//!
//! A stateless relay that fronts a single backend from a serverless edge:
//! every inbound request on the wildcard route is replayed against the
//! configured upstream, and each `Set-Cookie` in the reply is rewritten so
//! cross-site session cookies survive browser third-party cookie policy.

pub mod config;
pub mod http;
pub mod observability;

pub use config::{Environment, ForwarderConfig};
pub use http::HttpServer;
