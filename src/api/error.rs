//! HTTP error responses
//!
//! Every failure leaving the API is rendered here as
//! `{timestamp, status, error, message, path}`, plus `fieldErrors` for
//! validation failures and `resource`/`id` for missing resources.

use crate::domain::ReviewError;
use crate::log_error_with_context;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Handler result type
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug)]
enum ApiErrorKind {
    Review(ReviewError),
    /// Malformed path, query or body rejected before reaching a handler
    Rejected { status: StatusCode, message: String },
}

/// Error returned by handlers, tied to the request path it occurred on
#[derive(Debug)]
pub struct ApiError {
    kind: ApiErrorKind,
    path: String,
}

impl ApiError {
    pub fn new(error: ReviewError, path: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Review(error),
            path: path.into(),
        }
    }

    pub fn rejected(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Rejected {
                status,
                message: message.into(),
            },
            path: path.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match &self.kind {
            ApiErrorKind::Review(error) => status_for(error),
            ApiErrorKind::Rejected { status, .. } => *status,
        }
    }
}

/// Status code for each error kind
pub fn status_for(error: &ReviewError) -> StatusCode {
    match error {
        ReviewError::NotFound { .. } => StatusCode::NOT_FOUND,
        ReviewError::Validation(_) => StatusCode::BAD_REQUEST,
        ReviewError::Referential(_) => StatusCode::CONFLICT,
        ReviewError::Database(_)
        | ReviewError::Configuration(_)
        | ReviewError::Serialization(_)
        | ReviewError::Io(_)
        | ReviewError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Wire form of an error
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, String>>,
    /// Kind of resource a 404 refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    /// Identifier a 404 refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ErrorBody {
    fn new(status: StatusCode, message: String, path: String) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            path,
            field_errors: None,
            resource: None,
            id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self.kind {
            ApiErrorKind::Review(ReviewError::Validation(errors)) => {
                let mut fields: BTreeMap<String, String> = BTreeMap::new();
                for field_error in errors.errors() {
                    fields
                        .entry(field_error.field.clone())
                        .and_modify(|existing| {
                            existing.push_str("; ");
                            existing.push_str(&field_error.message);
                        })
                        .or_insert_with(|| field_error.message.clone());
                }
                let mut body = ErrorBody::new(status, "Validation failed".to_string(), self.path);
                body.field_errors = Some(fields);
                body
            }
            ApiErrorKind::Review(error) if status.is_server_error() => {
                log_error_with_context!(error, format!("Request to {} failed", self.path));
                ErrorBody::new(status, INTERNAL_MESSAGE.to_string(), self.path)
            }
            ApiErrorKind::Review(ReviewError::NotFound {
                resource,
                id,
                message,
            }) => {
                tracing::debug!(path = %self.path, resource, id, "Resource not found");
                let mut body = ErrorBody::new(status, message, self.path);
                body.resource = Some(resource.to_string());
                body.id = Some(id);
                body
            }
            ApiErrorKind::Review(error) => {
                tracing::debug!(path = %self.path, error = %error, "Request rejected");
                let message = match error {
                    ReviewError::Referential(message) => message,
                    other => other.to_string(),
                };
                ErrorBody::new(status, message, self.path)
            }
            ApiErrorKind::Rejected { message, .. } => ErrorBody::new(status, message, self.path),
        };

        (status, Json(body)).into_response()
    }
}

/// Attach the request path to a domain error
pub trait WithPath<T> {
    fn at(self, uri: &Uri) -> ApiResult<T>;
}

impl<T> WithPath<T> for std::result::Result<T, ReviewError> {
    fn at(self, uri: &Uri) -> ApiResult<T> {
        self.map_err(|error| ApiError::new(error, uri.path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DoctorId, ReportId, ValidationErrors};
    use test_case::test_case;

    #[test_case(ReviewError::report_not_found(ReportId::new(1)), StatusCode::NOT_FOUND; "not found")]
    #[test_case(ReviewError::invalid_field("notes", "blank"), StatusCode::BAD_REQUEST; "validation")]
    #[test_case(ReviewError::missing_reference("doctor"), StatusCode::CONFLICT; "referential")]
    #[test_case(ReviewError::Database("down".into()), StatusCode::INTERNAL_SERVER_ERROR; "database")]
    fn test_status_mapping(error: ReviewError, expected: StatusCode) {
        assert_eq!(status_for(&error), expected);
    }

    #[test]
    fn test_validation_fields_merged() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "Doctor name is required");
        errors.add("name", "too long");
        let response = ApiError::new(ReviewError::Validation(errors), "/api/doctor/doctors")
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_found_body_names_resource_and_id() {
        let response = ApiError::new(
            ReviewError::report_not_found(ReportId::new(42)),
            "/api/doctor/reports/42/approve",
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["resource"], "DonorMedicalReport");
        assert_eq!(body["id"], 42);
        assert_eq!(body["message"], "Medical report not found with id: 42");
        assert!(body.get("fieldErrors").is_none());
    }

    #[test]
    fn test_not_found_keeps_status() {
        let error = ApiError::new(ReviewError::doctor_not_found(DoctorId::new(3)), "/x");
        assert_eq!(error.status(), StatusCode::NOT_FOUND);
    }
}
