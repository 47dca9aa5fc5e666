//! Doctor model
//!
//! Doctors administer reports. A doctor can be renamed or re-specialized at
//! any time; deleting one removes every report it administers.

use super::ids::DoctorId;
use super::validation::{max_chars, require_not_blank, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Maximum length of a doctor's name, in characters
pub const MAX_NAME_CHARS: usize = 100;

/// Maximum length of a specialization, in characters
pub const MAX_SPECIALIZATION_CHARS: usize = 50;

/// A persisted doctor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialization: String,
}

impl Doctor {
    pub fn from_new(id: DoctorId, new: NewDoctor) -> Self {
        Self {
            id,
            name: new.name,
            specialization: new.specialization,
        }
    }
}

/// Create/update request body for a doctor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorPayload {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub specialization: Option<String>,
}

impl DoctorPayload {
    /// Checks the field constraints and returns the validated doctor data
    ///
    /// # Errors
    ///
    /// Returns all violations found.
    pub fn validate(self) -> Result<NewDoctor, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_not_blank(
            &mut errors,
            "name",
            self.name.as_deref(),
            "Doctor name is required",
        );
        max_chars(
            &mut errors,
            "name",
            self.name.as_deref(),
            MAX_NAME_CHARS,
            "Doctor name must not exceed 100 characters",
        );
        require_not_blank(
            &mut errors,
            "specialization",
            self.specialization.as_deref(),
            "Specialization is required",
        );
        max_chars(
            &mut errors,
            "specialization",
            self.specialization.as_deref(),
            MAX_SPECIALIZATION_CHARS,
            "Specialization must not exceed 50 characters",
        );

        match (self.name, self.specialization) {
            (Some(name), Some(specialization)) if errors.is_empty() => Ok(NewDoctor {
                name,
                specialization,
            }),
            _ => Err(errors),
        }
    }
}

/// Validated doctor data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub specialization: String,
}

impl NewDoctor {
    pub fn new(name: impl Into<String>, specialization: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specialization: specialization.into(),
        }
    }
}

/// Report counts for one doctor
///
/// `rejected_reports` counts every report that is not approved, so
/// `approved_reports + rejected_reports == total_reports` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorStatistics {
    pub total_reports: u64,
    pub approved_reports: u64,
    pub rejected_reports: u64,
}

impl DoctorStatistics {
    pub fn from_counts(total: u64, approved: u64) -> Self {
        Self {
            total_reports: total,
            approved_reports: approved,
            rejected_reports: total.saturating_sub(approved),
        }
    }
}
