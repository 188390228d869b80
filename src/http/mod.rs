//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → server.rs (Axum wildcard route, request ID, tracing)
//!     → server.rs forward() (target URL, allow-listed headers, body)
//!     → [single upstream backend]
//!     → response.rs (strip Content-Encoding, rewrite Set-Cookie)
//!     → cookie.rs (per-directive SameSite/Secure rewrite)
//!     → send to caller
//! ```

pub mod cookie;
pub mod request;
pub mod response;
pub mod server;

pub use cookie::{rewrite_set_cookie, CookiePolicy};
pub use request::{RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
