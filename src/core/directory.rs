//! Doctor directory
//!
//! CRUD over doctors. Deleting a doctor removes its reports with it.

use crate::adapters::database::traits::DoctorRepository;
use crate::domain::{Doctor, DoctorId, DoctorPayload, Result, ReviewError};
use std::sync::Arc;

#[derive(Clone)]
pub struct DoctorDirectory {
    doctors: Arc<dyn DoctorRepository>,
}

impl DoctorDirectory {
    pub fn new(doctors: Arc<dyn DoctorRepository>) -> Self {
        Self { doctors }
    }

    pub async fn create_doctor(&self, payload: DoctorPayload) -> Result<Doctor> {
        let doctor = self.doctors.create(payload.validate()?).await?;
        tracing::info!(doctor_id = %doctor.id, name = %doctor.name, "Doctor created");
        Ok(doctor)
    }

    pub async fn get_doctor(&self, id: DoctorId) -> Result<Doctor> {
        self.doctors
            .find_by_id(id)
            .await?
            .ok_or_else(|| ReviewError::doctor_not_found(id))
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        self.doctors.find_all().await
    }

    /// Replace the doctor's name and specialization
    pub async fn update_doctor(&self, id: DoctorId, payload: DoctorPayload) -> Result<Doctor> {
        let doctor = Doctor::from_new(id, payload.validate()?);
        self.doctors
            .update(&doctor)
            .await?
            .ok_or_else(|| ReviewError::doctor_not_found(id))
    }

    /// Remove the doctor and every report it administers
    pub async fn delete_doctor(&self, id: DoctorId) -> Result<()> {
        if !self.doctors.delete_by_id(id).await? {
            return Err(ReviewError::doctor_not_found(id));
        }
        tracing::info!(doctor_id = %id, "Doctor deleted");
        Ok(())
    }
}
