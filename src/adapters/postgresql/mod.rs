//! PostgreSQL database integration
//!
//! Stores doctors and donor medical reports in PostgreSQL via a deadpool
//! connection pool.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::{PostgreSQLDoctor, PostgreSQLReport};
