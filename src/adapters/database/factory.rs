//! Database client factory
//!
//! Builds the repository handles for the configured backend.

use crate::adapters::database::traits::{DatabaseClient, DoctorRepository, ReportRepository};
use crate::adapters::memory::MemoryAdapter;
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::config::schema::{DatabaseTarget, ReviewConfig};
use crate::domain::{Result, ReviewError};
use std::sync::Arc;

/// Handles onto one backend, all sharing the same connection pool or store
#[derive(Clone)]
pub struct Repositories {
    pub database: Arc<dyn DatabaseClient>,
    pub reports: Arc<dyn ReportRepository>,
    pub doctors: Arc<dyn DoctorRepository>,
}

impl Repositories {
    /// Wraps one adapter implementing every trait
    pub fn from_adapter<A>(adapter: Arc<A>) -> Self
    where
        A: DatabaseClient + ReportRepository + DoctorRepository + 'static,
    {
        Self {
            database: adapter.clone(),
            reports: adapter.clone(),
            doctors: adapter,
        }
    }

    /// Fresh, empty in-memory store
    pub fn in_memory() -> Self {
        Self::from_adapter(Arc::new(MemoryAdapter::new()))
    }
}

/// Create the repositories for the configured `database_target`
///
/// # Errors
///
/// Returns an error if the PostgreSQL pool cannot be created.
pub async fn create_repositories(config: &ReviewConfig) -> Result<Repositories> {
    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                ReviewError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            tracing::info!(
                connection = %client.connection_string_safe(),
                "Creating PostgreSQL repositories"
            );

            Ok(Repositories::from_adapter(Arc::new(PostgreSQLAdapter::new(
                client,
            ))))
        }
        DatabaseTarget::Memory => {
            tracing::warn!("Using in-memory store; data will be lost on exit");
            Ok(Repositories::in_memory())
        }
    }
}
