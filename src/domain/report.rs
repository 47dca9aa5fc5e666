//! Donor medical report model
//!
//! A report is a doctor's assessment of one donor. Reports are created with a
//! payload, mutated through the doctor service, and carry two timestamps that
//! only the store assigns.

use super::ids::{DoctorId, DonorId, ReportId};
use super::validation::{max_chars, require_not_blank, ValidationErrors};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Health status set when a doctor approves a donation
pub const FIT_TO_DONATE: &str = "Fit to Donate";

/// Health status set when a doctor rejects a donation
pub const UNFIT: &str = "Unfit";

/// Maximum length of the doctor notes, in characters
pub const MAX_NOTES_CHARS: usize = 1000;

/// Maximum length of the health status, in characters
pub const MAX_HEALTH_STATUS_CHARS: usize = 50;

/// Separator placed between consecutive note entries
pub const NOTES_SEPARATOR: &str = "\n\n";

/// A persisted donor medical report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorMedicalReport {
    /// Store-assigned identifier
    pub id: ReportId,

    /// Donor the report belongs to
    pub donor_id: DonorId,

    /// Doctor administering the report
    pub doctor_id: DoctorId,

    /// Free-text notes, accumulated over time
    pub doctor_notes: Option<String>,

    /// Free-text health classification
    pub health_status: Option<String>,

    /// Whether the donation may proceed
    pub is_approved: bool,

    /// Scheduled donation appointment
    pub appointment_date: Option<DateTime<Utc>>,

    /// Set once on insert
    pub created_at: DateTime<Utc>,

    /// Refreshed on every persisted mutation
    pub updated_at: DateTime<Utc>,
}

impl DonorMedicalReport {
    /// Builds the row an insert produces for `new` at time `now`
    pub fn from_new(id: ReportId, new: NewMedicalReport, now: DateTime<Utc>) -> Self {
        Self {
            id,
            donor_id: new.donor_id,
            doctor_id: new.doctor_id,
            doctor_notes: new.doctor_notes,
            health_status: new.health_status,
            is_approved: new.is_approved,
            appointment_date: new.appointment_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites every client-editable field with the values of `new`
    ///
    /// `id`, `created_at` and `updated_at` are left to the caller.
    pub fn apply(&mut self, new: NewMedicalReport) {
        self.donor_id = new.donor_id;
        self.doctor_id = new.doctor_id;
        self.doctor_notes = new.doctor_notes;
        self.health_status = new.health_status;
        self.is_approved = new.is_approved;
        self.appointment_date = new.appointment_date;
    }

    /// Notes, or an empty string when none were recorded
    pub fn notes_or_empty(&self) -> &str {
        self.doctor_notes.as_deref().unwrap_or("")
    }
}

/// Create/update request body for a report
///
/// Identifier and timestamps sent by a client are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReportPayload {
    /// Donor the report belongs to (required)
    #[serde(default)]
    pub donor_id: Option<DonorId>,

    /// Doctor administering the report (required)
    #[serde(default)]
    pub doctor_id: Option<DoctorId>,

    #[serde(default)]
    pub doctor_notes: Option<String>,

    #[serde(default)]
    pub health_status: Option<String>,

    /// Defaults to `false` when omitted
    #[serde(default)]
    pub is_approved: Option<bool>,

    /// RFC 3339, or a local date-time taken as UTC
    #[serde(default, deserialize_with = "super::timestamp::deserialize_option")]
    pub appointment_date: Option<DateTime<Utc>>,
}

impl MedicalReportPayload {
    /// Checks every field constraint and returns the validated report data
    ///
    /// # Errors
    ///
    /// Returns all violations found, not just the first.
    pub fn validate(self) -> Result<NewMedicalReport, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.donor_id.is_none() {
            errors.add("donorId", "Donor ID is required");
        }
        if self.doctor_id.is_none() {
            errors.add("doctorId", "Doctor ID is required");
        }
        max_chars(
            &mut errors,
            "doctorNotes",
            self.doctor_notes.as_deref(),
            MAX_NOTES_CHARS,
            "Doctor notes must not exceed 1000 characters",
        );
        max_chars(
            &mut errors,
            "healthStatus",
            self.health_status.as_deref(),
            MAX_HEALTH_STATUS_CHARS,
            "Health status must not exceed 50 characters",
        );

        match (self.donor_id, self.doctor_id) {
            (Some(donor_id), Some(doctor_id)) if errors.is_empty() => Ok(NewMedicalReport {
                donor_id,
                doctor_id,
                doctor_notes: self.doctor_notes,
                health_status: self.health_status,
                is_approved: self.is_approved.unwrap_or(false),
                appointment_date: self.appointment_date,
            }),
            _ => Err(errors),
        }
    }
}

/// Validated report data, ready to be inserted or applied to an existing row
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedicalReport {
    pub donor_id: DonorId,
    pub doctor_id: DoctorId,
    pub doctor_notes: Option<String>,
    pub health_status: Option<String>,
    pub is_approved: bool,
    pub appointment_date: Option<DateTime<Utc>>,
}

impl NewMedicalReport {
    /// Minimal report for a donor/doctor pair
    pub fn new(donor_id: DonorId, doctor_id: DoctorId) -> Self {
        Self {
            donor_id,
            doctor_id,
            doctor_notes: None,
            health_status: None,
            is_approved: false,
            appointment_date: None,
        }
    }

    pub fn with_health_status(mut self, status: impl Into<String>) -> Self {
        self.health_status = Some(status.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.doctor_notes = Some(notes.into());
        self
    }

    pub fn approved(mut self, approved: bool) -> Self {
        self.is_approved = approved;
        self
    }

    pub fn with_appointment(mut self, at: DateTime<Utc>) -> Self {
        self.appointment_date = Some(at);
        self
    }
}

/// Checks a single notes entry submitted by a doctor
///
/// # Errors
///
/// Fails when the entry is blank or longer than [`MAX_NOTES_CHARS`].
pub fn validate_notes_entry(notes: Option<&str>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    require_not_blank(&mut errors, "notes", notes, "Medical notes are required");
    max_chars(
        &mut errors,
        "notes",
        notes,
        MAX_NOTES_CHARS,
        "Medical notes must not exceed 1000 characters",
    );
    errors.into_result(())
}

/// Appends a notes entry to the existing notes
///
/// Empty existing notes are replaced; otherwise the entry follows the
/// existing text after a blank line.
pub fn append_notes(existing: &str, entry: &str) -> String {
    if existing.is_empty() {
        entry.to_string()
    } else {
        format!("{existing}{NOTES_SEPARATOR}{entry}")
    }
}

/// Timestamp the store assigns to a write
///
/// Truncated to microseconds (the resolution of `TIMESTAMPTZ`) and always
/// strictly after `previous`, so `updated_at` advances even when two writes
/// land within the same clock tick.
pub fn store_timestamp(previous: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    let now = DateTime::<Utc>::from_timestamp_micros(now.timestamp_micros()).unwrap_or(now);

    match previous {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}
