//! PostgreSQL client implementation
//!
//! Owns the connection pool and the schema migration. Queries go through
//! [`PostgreSQLClient::query`] and friends so every statement runs under the
//! configured statement timeout.

use crate::config::schema::PostgreSQLConfig;
use crate::domain::{Result, ReviewError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

/// Schema applied by [`PostgreSQLClient::ensure_schema`]
pub const INITIAL_SCHEMA: &str = include_str!("../../../migrations/001_initial_schema.sql");

/// PostgreSQL client backed by a deadpool connection pool
pub struct PostgreSQLClient {
    pool: Pool,
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// The pool connects lazily, so this succeeds without a reachable server.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed, the TLS
    /// connector cannot be built, or the pool cannot be created.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let mut pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .parse()
            .map_err(|e| {
                ReviewError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode(SslMode::Disable);
                Manager::from_config(pg_config, NoTls, manager_config)
            }
            mode => {
                pg_config.ssl_mode(if mode == "require" {
                    SslMode::Require
                } else {
                    SslMode::Prefer
                });
                let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
                    ReviewError::Configuration(format!("Failed to build TLS connector: {e}"))
                })?;
                Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
            }
        };

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| ReviewError::Database(format!("Failed to create connection pool: {e}")))?;

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| ReviewError::Database(format!("Connection test failed: {e}")))?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Create tables and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.get_connection().await?;

        client
            .batch_execute(INITIAL_SCHEMA)
            .await
            .map_err(|e| ReviewError::Database(format!("Failed to execute migration: {e}")))?;

        tracing::info!("PostgreSQL schema initialized successfully");
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| ReviewError::Database(format!("Failed to get connection from pool: {e}")))
    }

    /// `SET` statement applying the configured statement timeout
    ///
    /// With `local`, the setting only lasts until the end of the current
    /// transaction.
    pub fn statement_timeout_sql(&self, local: bool) -> String {
        format!(
            "SET {}statement_timeout = {}",
            if local { "LOCAL " } else { "" },
            self.config.statement_timeout_seconds * 1000
        )
    }

    /// Execute a query and return rows
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; see [`map_db_error`].
    pub async fn query(&self, query: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let client = self.timed_connection().await?;
        client
            .query(query, params)
            .await
            .map_err(|e| map_db_error("Query failed", e))
    }

    /// Execute a query returning at most one row
    pub async fn query_opt(
        &self,
        query: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>> {
        let client = self.timed_connection().await?;
        client
            .query_opt(query, params)
            .await
            .map_err(|e| map_db_error("Query failed", e))
    }

    /// Execute a statement and return the number of affected rows
    pub async fn execute(&self, statement: &str, params: &[&(dyn ToSql + Sync)]) -> Result<u64> {
        let client = self.timed_connection().await?;
        client
            .execute(statement, params)
            .await
            .map_err(|e| map_db_error("Statement execution failed", e))
    }

    async fn timed_connection(&self) -> Result<deadpool_postgres::Object> {
        let client = self.get_connection().await?;
        client
            .batch_execute(&self.statement_timeout_sql(false))
            .await
            .map_err(|e| ReviewError::Database(format!("Failed to set statement timeout: {e}")))?;
        Ok(client)
    }

    /// Get the connection string (without credentials)
    pub fn connection_string_safe(&self) -> String {
        self.config.connection_string_safe()
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

/// Convert a driver error into a [`ReviewError`]
///
/// Foreign key violations become [`ReviewError::Referential`], naming the
/// missing donor or doctor when the constraint identifies it.
pub fn map_db_error(context: &str, error: tokio_postgres::Error) -> ReviewError {
    if error.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION) {
        let constraint = error.as_db_error().and_then(|db| db.constraint());
        return match constraint {
            Some("fk_reports_donor") => ReviewError::missing_reference("donor"),
            Some("fk_reports_doctor") => ReviewError::missing_reference("doctor"),
            _ => ReviewError::Referential(error.to_string()),
        };
    }
    ReviewError::Database(format!("{context}: {error}"))
}
