//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Donor Review - medical report review backend for doctors
#[derive(Parser, Debug)]
#[command(name = "donor-review")]
#[command(version, about, long_about = None)]
#[command(author = "Donor Review Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "donor-review.toml",
        env = "DONOR_REVIEW_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DONOR_REVIEW_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API until interrupted
    Serve(commands::serve::ServeArgs),

    /// Create the schema and apply seed data, then exit
    Migrate(commands::migrate::MigrateArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
