//! Database abstraction traits
//!
//! Every backend implements the three traits below. Services only ever hold
//! `Arc<dyn …>` handles, so tests run against the in-memory backend and
//! production against PostgreSQL without either side knowing.

use crate::domain::{
    Doctor, DoctorId, DonorId, DonorMedicalReport, NewDoctor, NewMedicalReport, ReportId, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Change applied to a loaded report inside a write transaction
///
/// Returning an error aborts the transaction and leaves the row untouched.
/// Changes to `id` and `created_at` are never persisted.
pub type ReportMutation = Box<dyn FnOnce(&mut DonorMedicalReport) -> Result<()> + Send>;

/// Lifecycle operations on the underlying store
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Test the database connection
    ///
    /// # Errors
    ///
    /// Returns an error if the connection test fails.
    async fn test_connection(&self) -> Result<()>;

    /// Create tables and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    async fn ensure_schema(&self) -> Result<()>;

    /// Make a donor identifier known to the store so reports may reference it
    ///
    /// Donor records belong to the donor subsystem; this only guarantees the
    /// foreign key target exists. Registering a known donor is a no-op.
    async fn register_donor(&self, donor_id: DonorId) -> Result<()>;

    /// Short backend name for logs and health output
    fn backend_name(&self) -> &'static str;
}

/// Query and mutation surface over donor medical reports
///
/// Reads have no side effects. Each write is atomic: either the whole call is
/// persisted or nothing is.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn find_by_id(&self, id: ReportId) -> Result<Option<DonorMedicalReport>>;

    /// The donor's earliest report (`created_at`, then `id`, ascending)
    async fn find_by_donor_id(&self, donor_id: DonorId) -> Result<Option<DonorMedicalReport>>;

    /// The donor's most recently created report
    async fn find_latest_by_donor_id(
        &self,
        donor_id: DonorId,
    ) -> Result<Option<DonorMedicalReport>>;

    /// The donor's report for an exact appointment time
    async fn find_by_donor_id_and_appointment_date(
        &self,
        donor_id: DonorId,
        appointment_date: DateTime<Utc>,
    ) -> Result<Option<DonorMedicalReport>>;

    /// All reports administered by a doctor, ordered by id
    async fn find_by_doctor_id(&self, doctor_id: DoctorId) -> Result<Vec<DonorMedicalReport>>;

    async fn find_by_approval(&self, approved: bool) -> Result<Vec<DonorMedicalReport>>;

    /// Exact, case-sensitive match on the health status
    async fn find_by_health_status(&self, status: &str) -> Result<Vec<DonorMedicalReport>>;

    /// Reports whose appointment lies within `[start, end]`
    async fn find_by_appointment_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DonorMedicalReport>>;

    async fn count_by_doctor_id(&self, doctor_id: DoctorId) -> Result<u64>;

    async fn count_by_doctor_id_and_approved(&self, doctor_id: DoctorId) -> Result<u64>;

    /// Insert a new report, assigning its id and both timestamps
    ///
    /// # Errors
    ///
    /// [`ReviewError::Referential`](crate::domain::ReviewError::Referential)
    /// when the donor or doctor does not exist.
    async fn insert(&self, report: NewMedicalReport) -> Result<DonorMedicalReport>;

    /// Overwrite an existing report's fields, refreshing `updated_at`
    ///
    /// `created_at` is preserved. Returns `None` when no row has `report.id`.
    async fn save(&self, report: &DonorMedicalReport) -> Result<Option<DonorMedicalReport>>;

    /// Load, mutate and persist one report in a single transaction
    ///
    /// Returns `None` when no row has `id`.
    async fn modify(
        &self,
        id: ReportId,
        mutation: ReportMutation,
    ) -> Result<Option<DonorMedicalReport>>;

    /// Returns `true` when a row was deleted
    async fn delete_by_id(&self, id: ReportId) -> Result<bool>;

    async fn exists_by_id(&self, id: ReportId) -> Result<bool>;
}

/// Query and mutation surface over doctors
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor>;

    async fn find_by_id(&self, id: DoctorId) -> Result<Option<Doctor>>;

    /// All doctors, ordered by id
    async fn find_all(&self) -> Result<Vec<Doctor>>;

    /// Returns `None` when no row has `doctor.id`
    async fn update(&self, doctor: &Doctor) -> Result<Option<Doctor>>;

    /// Deletes the doctor and every report it administers.
    /// Returns `true` when a row was deleted.
    async fn delete_by_id(&self, id: DoctorId) -> Result<bool>;

    async fn count(&self) -> Result<u64>;
}
