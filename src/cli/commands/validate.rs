//! Validate config command implementation
//!
//! Loads the configuration file and prints a summary of the effective
//! settings without touching the database.

use super::EXIT_CONFIG_ERROR;
use crate::config::load_config;
use crate::config::schema::DatabaseTarget;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Listen Address: {}", config.server.bind_address());
        println!(
            "  Request Timeout: {}s",
            config.server.request_timeout_seconds
        );
        println!("  CORS Any Origin: {}", config.server.cors_allow_any_origin);

        match config.database_target {
            DatabaseTarget::PostgreSQL => {
                if let Some(ref pg_config) = config.postgresql {
                    println!("  Database Target: PostgreSQL");
                    println!(
                        "  PostgreSQL Connection: {}",
                        pg_config.connection_string_safe()
                    );
                    println!("  Max Connections: {}", pg_config.max_connections);
                    println!("  SSL Mode: {}", pg_config.ssl_mode);
                }
            }
            DatabaseTarget::Memory => {
                println!("  Database Target: in-memory (data is lost on exit)");
            }
        }

        if config.seed.enabled {
            println!("  Seed Donors: {:?}", config.seed.donor_ids);
            println!(
                "  Seed Doctors: {}",
                if config.seed.doctors.is_empty() {
                    "default roster".to_string()
                } else {
                    config.seed.doctors.len().to_string()
                }
            );
        } else {
            println!("  Seeding: disabled");
        }

        if config.logging.local_enabled {
            println!(
                "  File Logging: {} ({})",
                config.logging.local_path, config.logging.local_rotation
            );
        }
        println!();
        Ok(0)
    }
}
