//! Database abstraction layer
//!
//! Trait-based abstraction over the report and doctor stores, with a factory
//! selecting PostgreSQL or the in-memory backend from configuration.

pub mod factory;
pub mod traits;

pub use factory::{create_repositories, Repositories};
pub use traits::{DatabaseClient, DoctorRepository, ReportMutation, ReportRepository};
