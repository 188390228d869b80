//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → schema.rs apply_env_overrides (SERVER_URL, APP_ENV)
//!     → validation.rs (semantic checks)
//!     → ForwarderConfig (validated, immutable)
//!     → shared via AppState with the HTTP server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow running with env vars alone
//! - Environment variables always win over the file
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{Environment, ForwarderConfig, ListenerConfig, UpstreamConfig};
pub use validation::validate_config;
