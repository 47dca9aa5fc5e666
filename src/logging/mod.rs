//! Logging and observability
//!
//! Structured logging via `tracing`:
//! - Human-readable or JSON console output
//! - Configurable log levels, overridable through `RUST_LOG`
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use donor_review::logging::init_logging;
//! use donor_review::config::LoggingConfig;
//!
//! let _guard = init_logging("info", &LoggingConfig::default()).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a report state transition performed by a doctor
///
/// # Example
///
/// ```no_run
/// use donor_review::log_report_transition;
/// use donor_review::domain::{DonorMedicalReport, ReportId};
///
/// # fn example(report: &DonorMedicalReport) {
/// log_report_transition!("approve", report);
/// # }
/// ```
#[macro_export]
macro_rules! log_report_transition {
    ($action:expr, $report:expr) => {
        tracing::info!(
            action = $action,
            report_id = %$report.id,
            donor_id = %$report.donor_id,
            doctor_id = %$report.doctor_id,
            is_approved = $report.is_approved,
            health_status = $report.health_status.as_deref().unwrap_or(""),
            "Medical report updated"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use donor_review::log_error_with_context;
/// use donor_review::domain::ReviewError;
///
/// let error = ReviewError::Database("connection reset".to_string());
/// log_error_with_context!(&error, "Failed to load report");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error occurred"
        );
    };
}
