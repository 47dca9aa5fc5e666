//! Liveness endpoint

use super::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub version: &'static str,
}

/// `GET /health`: 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let (code, status) = match state.database.test_connection().await {
        Ok(()) => (StatusCode::OK, "UP"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "DOWN")
        }
    };

    (
        code,
        Json(HealthStatus {
            status,
            database: state.database.backend_name(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
