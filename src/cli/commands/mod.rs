//! CLI command implementations
//!
//! Every command returns the process exit code: 0 success, 2 configuration
//! error, 4 connection error, 5 fatal error.

pub mod init;
pub mod migrate;
pub mod serve;
pub mod validate;

use crate::adapters::database::{create_repositories, Repositories};
use crate::config::{load_config, ReviewConfig};

pub(crate) const EXIT_CONFIG_ERROR: i32 = 2;
pub(crate) const EXIT_CONNECTION_ERROR: i32 = 4;
pub(crate) const EXIT_FATAL: i32 = 5;

/// Load the configuration, printing the failure
fn load_or_report(config_path: &str) -> Result<ReviewConfig, i32> {
    load_config(config_path).map_err(|e| {
        println!("❌ Failed to load configuration file: {config_path}");
        println!("   Error: {e}");
        EXIT_CONFIG_ERROR
    })
}

/// Connect to the configured store and make sure the schema exists
async fn connect_or_report(config: &ReviewConfig) -> Result<Repositories, i32> {
    let repos = create_repositories(config).await.map_err(|e| {
        println!("❌ Failed to create database client");
        println!("   Error: {e}");
        EXIT_CONNECTION_ERROR
    })?;

    if let Err(e) = repos.database.test_connection().await {
        println!("❌ Database connection failed");
        println!("   Error: {e}");
        return Err(EXIT_CONNECTION_ERROR);
    }

    if let Err(e) = repos.database.ensure_schema().await {
        println!("❌ Failed to create schema");
        println!("   Error: {e}");
        return Err(EXIT_CONNECTION_ERROR);
    }

    println!(
        "✅ Connected to {} store",
        repos.database.backend_name()
    );
    Ok(repos)
}
