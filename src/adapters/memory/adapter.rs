//! In-memory adapter implementing database traits
//!
//! Keeps every table in ordered maps behind a single `RwLock`. Each write
//! holds the write guard for its whole duration, which makes it atomic. Foreign
//! keys and the cascade from doctors to reports are enforced by hand.

use crate::adapters::database::traits::{
    DatabaseClient, DoctorRepository, ReportMutation, ReportRepository,
};
use crate::domain::report::store_timestamp;
use crate::domain::{
    Doctor, DoctorId, DonorId, DonorMedicalReport, NewDoctor, NewMedicalReport, ReportId, Result,
    ReviewError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MemoryState {
    donors: BTreeSet<DonorId>,
    doctors: BTreeMap<DoctorId, Doctor>,
    reports: BTreeMap<ReportId, DonorMedicalReport>,
    last_doctor_id: i64,
    last_report_id: i64,
}

impl MemoryState {
    fn check_references(&self, donor_id: DonorId, doctor_id: DoctorId) -> Result<()> {
        if !self.donors.contains(&donor_id) {
            return Err(ReviewError::missing_reference("donor"));
        }
        if !self.doctors.contains_key(&doctor_id) {
            return Err(ReviewError::missing_reference("doctor"));
        }
        Ok(())
    }

    fn reports_where(
        &self,
        predicate: impl Fn(&DonorMedicalReport) -> bool,
    ) -> Vec<DonorMedicalReport> {
        self.reports
            .values()
            .filter(|report| predicate(report))
            .cloned()
            .collect()
    }

    /// Persists `report` over the stored row with the same id
    fn overwrite(&mut self, mut report: DonorMedicalReport) -> Result<Option<DonorMedicalReport>> {
        let Some(existing) = self.reports.get(&report.id) else {
            return Ok(None);
        };
        let created_at = existing.created_at;
        let previous = existing.updated_at;

        self.check_references(report.donor_id, report.doctor_id)?;

        report.created_at = created_at;
        report.updated_at = store_timestamp(Some(previous));
        self.reports.insert(report.id, report.clone());
        Ok(Some(report))
    }
}

/// Volatile store used for local runs and tests
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    state: RwLock<MemoryState>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatabaseClient for MemoryAdapter {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn register_donor(&self, donor_id: DonorId) -> Result<()> {
        self.state.write().await.donors.insert(donor_id);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[async_trait]
impl ReportRepository for MemoryAdapter {
    async fn find_by_id(&self, id: ReportId) -> Result<Option<DonorMedicalReport>> {
        Ok(self.state.read().await.reports.get(&id).cloned())
    }

    async fn find_by_donor_id(&self, donor_id: DonorId) -> Result<Option<DonorMedicalReport>> {
        let state = self.state.read().await;
        Ok(state
            .reports
            .values()
            .filter(|r| r.donor_id == donor_id)
            .min_by_key(|r| (r.created_at, r.id))
            .cloned())
    }

    async fn find_latest_by_donor_id(
        &self,
        donor_id: DonorId,
    ) -> Result<Option<DonorMedicalReport>> {
        let state = self.state.read().await;
        Ok(state
            .reports
            .values()
            .filter(|r| r.donor_id == donor_id)
            .max_by_key(|r| (r.created_at, r.id))
            .cloned())
    }

    async fn find_by_donor_id_and_appointment_date(
        &self,
        donor_id: DonorId,
        appointment_date: DateTime<Utc>,
    ) -> Result<Option<DonorMedicalReport>> {
        let state = self.state.read().await;
        Ok(state
            .reports
            .values()
            .find(|r| r.donor_id == donor_id && r.appointment_date == Some(appointment_date))
            .cloned())
    }

    async fn find_by_doctor_id(&self, doctor_id: DoctorId) -> Result<Vec<DonorMedicalReport>> {
        Ok(self
            .state
            .read()
            .await
            .reports_where(|r| r.doctor_id == doctor_id))
    }

    async fn find_by_approval(&self, approved: bool) -> Result<Vec<DonorMedicalReport>> {
        Ok(self
            .state
            .read()
            .await
            .reports_where(|r| r.is_approved == approved))
    }

    async fn find_by_health_status(&self, status: &str) -> Result<Vec<DonorMedicalReport>> {
        Ok(self
            .state
            .read()
            .await
            .reports_where(|r| r.health_status.as_deref() == Some(status)))
    }

    async fn find_by_appointment_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DonorMedicalReport>> {
        let mut reports = self.state.read().await.reports_where(|r| {
            r.appointment_date
                .is_some_and(|at| at >= start && at <= end)
        });
        reports.sort_by_key(|r| (r.appointment_date, r.id));
        Ok(reports)
    }

    async fn count_by_doctor_id(&self, doctor_id: DoctorId) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .reports
            .values()
            .filter(|r| r.doctor_id == doctor_id)
            .count() as u64)
    }

    async fn count_by_doctor_id_and_approved(&self, doctor_id: DoctorId) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .reports
            .values()
            .filter(|r| r.doctor_id == doctor_id && r.is_approved)
            .count() as u64)
    }

    async fn insert(&self, report: NewMedicalReport) -> Result<DonorMedicalReport> {
        let mut state = self.state.write().await;
        state.check_references(report.donor_id, report.doctor_id)?;

        state.last_report_id += 1;
        let id = ReportId::new(state.last_report_id);
        let inserted = DonorMedicalReport::from_new(id, report, store_timestamp(None));
        state.reports.insert(id, inserted.clone());

        tracing::debug!(report_id = %id, donor_id = %inserted.donor_id, "Inserted medical report");
        Ok(inserted)
    }

    async fn save(&self, report: &DonorMedicalReport) -> Result<Option<DonorMedicalReport>> {
        self.state.write().await.overwrite(report.clone())
    }

    async fn modify(
        &self,
        id: ReportId,
        mutation: ReportMutation,
    ) -> Result<Option<DonorMedicalReport>> {
        let mut state = self.state.write().await;
        let Some(mut report) = state.reports.get(&id).cloned() else {
            return Ok(None);
        };

        mutation(&mut report)?;
        report.id = id;
        state.overwrite(report)
    }

    async fn delete_by_id(&self, id: ReportId) -> Result<bool> {
        Ok(self.state.write().await.reports.remove(&id).is_some())
    }

    async fn exists_by_id(&self, id: ReportId) -> Result<bool> {
        Ok(self.state.read().await.reports.contains_key(&id))
    }
}

#[async_trait]
impl DoctorRepository for MemoryAdapter {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor> {
        let mut state = self.state.write().await;
        state.last_doctor_id += 1;
        let id = DoctorId::new(state.last_doctor_id);
        let created = Doctor::from_new(id, doctor);
        state.doctors.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: DoctorId) -> Result<Option<Doctor>> {
        Ok(self.state.read().await.doctors.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Doctor>> {
        Ok(self.state.read().await.doctors.values().cloned().collect())
    }

    async fn update(&self, doctor: &Doctor) -> Result<Option<Doctor>> {
        let mut state = self.state.write().await;
        match state.doctors.get_mut(&doctor.id) {
            Some(existing) => {
                *existing = doctor.clone();
                Ok(Some(doctor.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: DoctorId) -> Result<bool> {
        let mut state = self.state.write().await;
        if state.doctors.remove(&id).is_none() {
            return Ok(false);
        }

        let before = state.reports.len();
        state.reports.retain(|_, report| report.doctor_id != id);
        tracing::debug!(
            doctor_id = %id,
            reports_removed = before - state.reports.len(),
            "Deleted doctor"
        );
        Ok(true)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.state.read().await.doctors.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FIT_TO_DONATE;
    use chrono::TimeZone;

    async fn store_with_doctor() -> (MemoryAdapter, DoctorId) {
        let store = MemoryAdapter::new();
        store.register_donor(DonorId::new(1)).await.unwrap();
        let doctor = store
            .create(NewDoctor::new("Dr. Amelia Hart", "Hematology"))
            .await
            .unwrap();
        (store, doctor.id)
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_timestamps() {
        let (store, doctor_id) = store_with_doctor().await;

        let first = store
            .insert(NewMedicalReport::new(DonorId::new(1), doctor_id))
            .await
            .unwrap();
        let second = store
            .insert(NewMedicalReport::new(DonorId::new(1), doctor_id))
            .await
            .unwrap();

        assert_eq!(first.id, ReportId::new(1));
        assert_eq!(second.id, ReportId::new(2));
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_references() {
        let (store, doctor_id) = store_with_doctor().await;

        let unknown_donor = store
            .insert(NewMedicalReport::new(DonorId::new(99), doctor_id))
            .await;
        assert!(matches!(unknown_donor, Err(ReviewError::Referential(_))));

        let unknown_doctor = store
            .insert(NewMedicalReport::new(DonorId::new(1), DoctorId::new(99)))
            .await;
        assert!(matches!(unknown_doctor, Err(ReviewError::Referential(_))));

        assert!(store.find_by_approval(false).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_modify_preserves_created_at_and_advances_updated_at() {
        let (store, doctor_id) = store_with_doctor().await;
        let report = store
            .insert(NewMedicalReport::new(DonorId::new(1), doctor_id))
            .await
            .unwrap();

        let updated = store
            .modify(
                report.id,
                Box::new(|r: &mut DonorMedicalReport| {
                    r.is_approved = true;
                    r.health_status = Some(FIT_TO_DONATE.to_string());
                    r.created_at = Utc::now() + chrono::Duration::days(1);
                    Ok(())
                }),
            )
            .await
            .unwrap()
            .unwrap();

        assert!(updated.is_approved);
        assert_eq!(updated.created_at, report.created_at);
        assert!(updated.updated_at > report.updated_at);
    }

    #[tokio::test]
    async fn test_failed_mutation_leaves_row_unchanged() {
        let (store, doctor_id) = store_with_doctor().await;
        let report = store
            .insert(NewMedicalReport::new(DonorId::new(1), doctor_id))
            .await
            .unwrap();

        let result = store
            .modify(
                report.id,
                Box::new(|r: &mut DonorMedicalReport| {
                    r.is_approved = true;
                    Err(ReviewError::invalid_field("notes", "too long"))
                }),
            )
            .await;

        assert!(matches!(result, Err(ReviewError::Validation(_))));
        assert_eq!(
            ReportRepository::find_by_id(&store, report.id).await.unwrap(),
            Some(report)
        );
    }

    #[tokio::test]
    async fn test_modify_missing_report_returns_none() {
        let store = MemoryAdapter::new();
        let result = store
            .modify(ReportId::new(5), Box::new(|_: &mut DonorMedicalReport| Ok(())))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_earliest_and_latest_for_donor() {
        let (store, doctor_id) = store_with_doctor().await;
        let first = store
            .insert(NewMedicalReport::new(DonorId::new(1), doctor_id))
            .await
            .unwrap();
        let second = store
            .insert(NewMedicalReport::new(DonorId::new(1), doctor_id))
            .await
            .unwrap();

        let earliest = store.find_by_donor_id(DonorId::new(1)).await.unwrap();
        let latest = store.find_latest_by_donor_id(DonorId::new(1)).await.unwrap();

        assert_eq!(earliest.map(|r| r.id), Some(first.id));
        assert_eq!(latest.map(|r| r.id), Some(second.id));
    }

    #[tokio::test]
    async fn test_appointment_range_is_inclusive() {
        let (store, doctor_id) = store_with_doctor().await;
        let day = |d| Utc.with_ymd_and_hms(2025, 6, d, 10, 0, 0).unwrap();

        for d in [1, 5, 10] {
            store
                .insert(NewMedicalReport::new(DonorId::new(1), doctor_id).with_appointment(day(d)))
                .await
                .unwrap();
        }

        let in_range = store
            .find_by_appointment_range(day(1), day(5))
            .await
            .unwrap();
        assert_eq!(in_range.len(), 2);

        let exact = store
            .find_by_donor_id_and_appointment_date(DonorId::new(1), day(10))
            .await
            .unwrap();
        assert!(exact.is_some());
    }

    #[tokio::test]
    async fn test_deleting_doctor_cascades_to_reports() {
        let (store, doctor_id) = store_with_doctor().await;
        let report = store
            .insert(NewMedicalReport::new(DonorId::new(1), doctor_id))
            .await
            .unwrap();

        assert!(DoctorRepository::delete_by_id(&store, doctor_id).await.unwrap());
        assert!(!store.exists_by_id(report.id).await.unwrap());
        assert!(!DoctorRepository::delete_by_id(&store, doctor_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_row_only() {
        let (store, doctor_id) = store_with_doctor().await;
        let original = store
            .insert(NewMedicalReport::new(DonorId::new(1), doctor_id))
            .await
            .unwrap();

        let mut edited = original.clone();
        edited.health_status = Some("Deferred".to_string());
        edited.created_at = original.created_at - chrono::Duration::days(1);
        let saved = store.save(&edited).await.unwrap().unwrap();

        assert_eq!(saved.health_status.as_deref(), Some("Deferred"));
        assert_eq!(saved.created_at, original.created_at);
        assert!(saved.updated_at > original.updated_at);

        let mut missing = original;
        missing.id = ReportId::new(42);
        assert!(store.save(&missing).await.unwrap().is_none());
    }
}
