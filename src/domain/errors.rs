//! Domain error types
//!
//! All layers report failures through [`ReviewError`]. The HTTP boundary is the
//! only place that turns these into status codes and response bodies.

use super::ids::{DoctorId, DonorId, ReportId};
use super::validation::ValidationErrors;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum ReviewError {
    /// A requested report or doctor does not exist
    #[error("{message}")]
    NotFound {
        /// Kind of resource that was looked up
        resource: &'static str,
        /// Identifier that was looked up
        id: i64,
        /// Descriptive message returned to the client
        message: String,
    },

    /// A payload violates one or more field constraints
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A write references a donor or doctor that does not exist
    #[error("Referential integrity violation: {0}")]
    Referential(String),

    /// Database errors
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ReviewError {
    /// No report carries this identifier
    pub fn report_not_found(id: ReportId) -> Self {
        Self::NotFound {
            resource: "DonorMedicalReport",
            id: id.value(),
            message: format!("Medical report not found with id: {id}"),
        }
    }

    /// The donor has no report at all
    pub fn report_not_found_for_donor(donor_id: DonorId) -> Self {
        Self::NotFound {
            resource: "DonorMedicalReport",
            id: donor_id.value(),
            message: format!("Medical report not found for donor id: {donor_id}"),
        }
    }

    /// The donor has no report to pick a latest one from
    pub fn no_latest_report_for_donor(donor_id: DonorId) -> Self {
        Self::NotFound {
            resource: "DonorMedicalReport",
            id: donor_id.value(),
            message: format!("No medical report found for donor id: {donor_id}"),
        }
    }

    /// No doctor carries this identifier
    pub fn doctor_not_found(id: DoctorId) -> Self {
        Self::NotFound {
            resource: "Doctor",
            id: id.value(),
            message: format!("Doctor not found with id: {id}"),
        }
    }

    /// A write referenced a donor or doctor that is not in the store
    pub fn missing_reference(resource: &str) -> Self {
        Self::Referential(format!("Referenced {resource} does not exist"))
    }

    /// Shorthand for a validation failure on a single field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        Self::Validation(ValidationErrors::single(field, message))
    }

    /// True for [`ReviewError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<std::io::Error> for ReviewError {
    fn from(err: std::io::Error) -> Self {
        ReviewError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReviewError {
    fn from(err: serde_json::Error) -> Self {
        ReviewError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ReviewError {
    fn from(err: toml::de::Error) -> Self {
        ReviewError::Configuration(format!("TOML parse error: {err}"))
    }
}
