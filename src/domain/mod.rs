//! Domain models and types.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ReportId`], [`DoctorId`], [`DonorId`])
//! - **Entities** ([`DonorMedicalReport`], [`Doctor`]) and their validated
//!   request payloads
//! - **Field validation** ([`ValidationErrors`])
//! - **Error types** ([`ReviewError`]) and the [`Result`] alias
//!
//! # Validation
//!
//! Payloads are validated into their `New*` counterparts before anything
//! reaches the store:
//!
//! ```rust
//! use donor_review::domain::{MedicalReportPayload, DonorId, DoctorId};
//!
//! let payload = MedicalReportPayload {
//!     donor_id: Some(DonorId::new(1)),
//!     doctor_id: Some(DoctorId::new(2)),
//!     health_status: Some("Pending".to_string()),
//!     ..Default::default()
//! };
//!
//! let new_report = payload.validate().expect("valid payload");
//! assert!(!new_report.is_approved);
//! ```

pub mod doctor;
pub mod errors;
pub mod ids;
pub mod report;
pub mod result;
pub mod timestamp;
pub mod validation;

pub use doctor::{Doctor, DoctorPayload, DoctorStatistics, NewDoctor};
pub use errors::ReviewError;
pub use ids::{DoctorId, DonorId, ReportId};
pub use report::{DonorMedicalReport, MedicalReportPayload, NewMedicalReport, FIT_TO_DONATE, UNFIT};
pub use result::Result;
pub use validation::{FieldError, ValidationErrors};
