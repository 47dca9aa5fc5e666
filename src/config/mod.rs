//! Configuration management.
//!
//! # Overview
//!
//! The service reads a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DONOR_REVIEW_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`ServerConfig`] - HTTP bind address, timeout, CORS
//! - [`PostgreSQLConfig`] - Connection pool settings
//! - [`SeedConfig`] - Donors and doctors created at startup
//! - [`LoggingConfig`] - Console format and file logging
//!
//! # Example Configuration
//!
//! ```toml
//! database_target = "postgresql"
//!
//! [application]
//! log_level = "info"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [postgresql]
//! connection_string = "${DATABASE_URL}"
//! max_connections = 10
//!
//! [seed]
//! donor_ids = [1, 2, 3]
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str};
pub use schema::{
    ApplicationConfig, DatabaseTarget, LoggingConfig, PostgreSQLConfig, ReviewConfig, SeedConfig,
    SeedDoctor, ServerConfig,
};
