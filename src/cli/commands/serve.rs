//! Serve command implementation
//!
//! Connects to the store, ensures the schema and seed data, then runs the
//! HTTP API until the shutdown signal fires.

use super::{connect_or_report, load_or_report, EXIT_CONFIG_ERROR, EXIT_FATAL};
use crate::api::{router, serve, AppState};
use crate::core::apply_seed;
use clap::Args;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Override `server.port`
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting server");

        let mut config = match load_or_report(config_path) {
            Ok(config) => config,
            Err(code) => return Ok(code),
        };

        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Err(e) = config.validate() {
            println!("❌ Configuration validation failed");
            println!("   Error: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let repos = match connect_or_report(&config).await {
            Ok(repos) => repos,
            Err(code) => return Ok(code),
        };

        if let Err(e) = apply_seed(&repos, &config.seed).await {
            println!("❌ Failed to apply seed data");
            println!("   Error: {e}");
            return Ok(EXIT_FATAL);
        }

        let address = config.server.bind_address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(e) => {
                println!("❌ Failed to bind {address}");
                println!("   Error: {e}");
                return Ok(EXIT_FATAL);
            }
        };

        println!("🚀 Listening on http://{address}/api/doctor");

        let app = router(AppState::from_repositories(&repos), &config.server);
        serve(listener, app, shutdown_signal).await?;

        println!("✅ Server stopped");
        Ok(0)
    }
}
