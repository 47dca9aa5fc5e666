//! HTTP API
//!
//! All doctor operations live under `/api/doctor`; `/health` sits outside the
//! prefix. Bodies are JSON with camelCase fields.
//!
//! # Example
//!
//! ```rust
//! use donor_review::adapters::database::Repositories;
//! use donor_review::api::{router, AppState};
//! use donor_review::config::ServerConfig;
//!
//! let state = AppState::from_repositories(&Repositories::in_memory());
//! let app = router(state, &ServerConfig::default());
//! # let _ = app;
//! ```

pub mod doctors;
pub mod error;
pub mod extract;
pub mod health;
pub mod reports;

pub use error::{ApiError, ApiResult, ErrorBody};

use crate::adapters::database::{DatabaseClient, Repositories};
use crate::config::ServerConfig;
use crate::core::{DoctorDirectory, DoctorService};
use crate::domain::Result;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub doctor_service: DoctorService,
    pub directory: DoctorDirectory,
    pub database: Arc<dyn DatabaseClient>,
}

impl AppState {
    pub fn from_repositories(repos: &Repositories) -> Self {
        Self {
            doctor_service: DoctorService::new(repos.reports.clone()),
            directory: DoctorDirectory::new(repos.doctors.clone()),
            database: repos.database.clone(),
        }
    }
}

fn doctor_routes() -> Router<AppState> {
    Router::new()
        .route("/reports", post(reports::create_medical_report))
        .route("/reports/approved", get(reports::get_approved_reports))
        .route("/reports/unapproved", get(reports::get_unapproved_reports))
        .route(
            "/reports/appointments",
            get(reports::get_reports_by_appointment_range),
        )
        .route(
            "/reports/status/:health_status",
            get(reports::get_reports_by_health_status),
        )
        .route("/reports/donor/:donor_id", get(reports::get_medical_report))
        .route(
            "/reports/donor/:donor_id/latest",
            get(reports::get_latest_medical_report),
        )
        .route(
            "/reports/donor/:donor_id/exists",
            get(reports::has_medical_report),
        )
        .route(
            "/reports/doctor/:doctor_id",
            get(reports::get_reports_by_doctor),
        )
        .route(
            "/reports/:report_id",
            put(reports::update_medical_report).delete(reports::delete_medical_report),
        )
        .route(
            "/reports/:report_id/approve",
            put(reports::approve_donation),
        )
        .route("/reports/:report_id/reject", put(reports::reject_donation))
        .route(
            "/reports/:report_id/add-notes",
            put(reports::add_medical_notes),
        )
        .route(
            "/statistics/:doctor_id",
            get(reports::get_doctor_statistics),
        )
        .route(
            "/doctors",
            get(doctors::list_doctors).post(doctors::create_doctor),
        )
        .route(
            "/doctors/:doctor_id",
            get(doctors::get_doctor)
                .put(doctors::update_doctor)
                .delete(doctors::delete_doctor),
        )
}

/// Build the application router
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let app = Router::new()
        .nest("/api/doctor", doctor_routes())
        .route("/health", get(health::health))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            server.request_timeout_seconds,
        )))
        .layer(TraceLayer::new_for_http());

    if server.cors_allow_any_origin {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

/// Serve `app` until `shutdown` flips to `true`
///
/// In-flight requests are allowed to finish.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let address = listener.local_addr()?;
    tracing::info!(address = %address, "HTTP server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            // A dropped sender also ends the server.
            let _ = shutdown.wait_for(|stop| *stop).await;
            tracing::info!("Shutdown signal received, draining connections");
        })
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
