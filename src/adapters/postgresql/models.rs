//! PostgreSQL row models
//!
//! Row structures for the `donor_medical_reports` and `doctors` tables and
//! their conversion to domain types.

use crate::domain::{Doctor, DoctorId, DonorId, DonorMedicalReport, ReportId, Result, ReviewError};
use chrono::{DateTime, Utc};
use tokio_postgres::Row;

/// Column list selected for every report query, in [`PostgreSQLReport`] order
pub const REPORT_COLUMNS: &str = "id, donor_id, doctor_id, doctor_notes, health_status, \
     is_approved, appointment_date, created_at, updated_at";

/// Column list selected for every doctor query
pub const DOCTOR_COLUMNS: &str = "id, name, specialization";

/// Row of the `donor_medical_reports` table
#[derive(Debug, Clone, PartialEq)]
pub struct PostgreSQLReport {
    pub id: i64,
    pub donor_id: i64,
    pub doctor_id: i64,
    pub doctor_notes: Option<String>,
    pub health_status: Option<String>,
    pub is_approved: bool,
    pub appointment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostgreSQLReport {
    /// Read a row selected with [`REPORT_COLUMNS`]
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: column(row, "id")?,
            donor_id: column(row, "donor_id")?,
            doctor_id: column(row, "doctor_id")?,
            doctor_notes: column(row, "doctor_notes")?,
            health_status: column(row, "health_status")?,
            is_approved: column(row, "is_approved")?,
            appointment_date: column(row, "appointment_date")?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
        })
    }

    pub fn to_domain(self) -> DonorMedicalReport {
        DonorMedicalReport {
            id: ReportId::new(self.id),
            donor_id: DonorId::new(self.donor_id),
            doctor_id: DoctorId::new(self.doctor_id),
            doctor_notes: self.doctor_notes,
            health_status: self.health_status,
            is_approved: self.is_approved,
            appointment_date: self.appointment_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row of the `doctors` table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgreSQLDoctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
}

impl PostgreSQLDoctor {
    /// Read a row selected with [`DOCTOR_COLUMNS`]
    pub fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: column(row, "id")?,
            name: column(row, "name")?,
            specialization: column(row, "specialization")?,
        })
    }

    pub fn to_domain(self) -> Doctor {
        Doctor {
            id: DoctorId::new(self.id),
            name: self.name,
            specialization: self.specialization,
        }
    }
}

/// Map every row with `convert`, stopping at the first failure
pub fn map_rows<T>(rows: &[Row], convert: impl Fn(&Row) -> Result<T>) -> Result<Vec<T>> {
    rows.iter().map(convert).collect()
}

/// Read one report row straight into the domain type
pub fn report_from_row(row: &Row) -> Result<DonorMedicalReport> {
    PostgreSQLReport::from_row(row).map(PostgreSQLReport::to_domain)
}

/// Read one doctor row straight into the domain type
pub fn doctor_from_row(row: &Row) -> Result<Doctor> {
    PostgreSQLDoctor::from_row(row).map(PostgreSQLDoctor::to_domain)
}

fn column<'a, T>(row: &'a Row, name: &str) -> Result<T>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(name)
        .map_err(|e| ReviewError::Database(format!("Failed to read column '{name}': {e}")))
}

/// Convert a row count returned by `COUNT(*)`
pub fn count_from_row(row: &Row) -> Result<u64> {
    let count: i64 = column(row, "count")?;
    u64::try_from(count)
        .map_err(|_| ReviewError::Database(format!("Negative row count returned: {count}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_to_domain() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let row = PostgreSQLReport {
            id: 7,
            donor_id: 3,
            doctor_id: 2,
            doctor_notes: Some("Hemoglobin normal".to_string()),
            health_status: Some("Fit to Donate".to_string()),
            is_approved: true,
            appointment_date: None,
            created_at: created,
            updated_at: created,
        };

        let report = row.to_domain();
        assert_eq!(report.id, ReportId::new(7));
        assert_eq!(report.donor_id, DonorId::new(3));
        assert_eq!(report.doctor_id, DoctorId::new(2));
        assert!(report.is_approved);
        assert_eq!(report.created_at, created);
    }

    #[test]
    fn test_doctor_to_domain() {
        let doctor = PostgreSQLDoctor {
            id: 4,
            name: "Dr. Amelia Hart".to_string(),
            specialization: "Hematology".to_string(),
        }
        .to_domain();

        assert_eq!(doctor.id, DoctorId::new(4));
        assert_eq!(doctor.specialization, "Hematology");
    }

    #[test]
    fn test_report_columns_match_struct_order() {
        let columns: Vec<&str> = REPORT_COLUMNS.split(',').map(str::trim).collect();
        assert_eq!(columns.first(), Some(&"id"));
        assert_eq!(columns.last(), Some(&"updated_at"));
        assert_eq!(columns.len(), 9);
    }
}
