//! Migrate command implementation
//!
//! Creates the schema in the configured store and applies the seed data
//! without starting the server.

use super::{connect_or_report, load_or_report, EXIT_FATAL};
use crate::core::apply_seed;
use clap::Args;

/// Arguments for the migrate command
#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Only create the schema, do not apply seed data
    #[arg(long)]
    pub skip_seed: bool,
}

impl MigrateArgs {
    /// Execute the migrate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, skip_seed = self.skip_seed, "Running migration");

        println!("🛠️  Migrating database from {config_path}");
        println!();

        let config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        let repos = match connect_or_report(&config).await {
            Ok(repos) => repos,
            Err(code) => return Ok(code),
        };
        println!("✅ Schema is up to date");

        if self.skip_seed {
            println!("⏭️  Seed data skipped");
            return Ok(0);
        }

        match apply_seed(&repos, &config.seed).await {
            Ok(summary) => {
                println!("✅ Seed data applied");
                println!("  Donors registered: {}", summary.donors_registered);
                println!("  Doctors created: {}", summary.doctors_created);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to apply seed data");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }
}
