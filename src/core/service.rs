//! Doctor-facing report workflow
//!
//! [`DoctorService`] is the only component that changes report state. Every
//! write goes through [`ReportRepository::modify`] or
//! [`ReportRepository::insert`], so a failed validation never leaves a
//! half-written row behind.

use crate::adapters::database::traits::{ReportMutation, ReportRepository};
use crate::domain::report::{append_notes, validate_notes_entry, MAX_NOTES_CHARS};
use crate::domain::validation::char_len;
use crate::domain::{
    DoctorId, DoctorStatistics, DonorId, DonorMedicalReport, MedicalReportPayload, ReportId,
    Result, ReviewError, FIT_TO_DONATE, UNFIT,
};
use crate::log_report_transition;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Report review operations performed by doctors
#[derive(Clone)]
pub struct DoctorService {
    reports: Arc<dyn ReportRepository>,
}

impl DoctorService {
    pub fn new(reports: Arc<dyn ReportRepository>) -> Self {
        Self { reports }
    }

    /// Mark the report fit to donate
    ///
    /// Approving an already approved report is allowed; only `updated_at`
    /// changes.
    ///
    /// # Errors
    ///
    /// [`ReviewError::NotFound`] when no report has `report_id`.
    pub async fn approve_donation(&self, report_id: ReportId) -> Result<DonorMedicalReport> {
        let report = self
            .modify(
                report_id,
                Box::new(|report: &mut DonorMedicalReport| {
                    report.is_approved = true;
                    report.health_status = Some(FIT_TO_DONATE.to_string());
                    Ok(())
                }),
            )
            .await?;

        log_report_transition!("approve", report);
        Ok(report)
    }

    /// Mark the report unfit to donate
    ///
    /// # Errors
    ///
    /// [`ReviewError::NotFound`] when no report has `report_id`.
    pub async fn reject_donation(&self, report_id: ReportId) -> Result<DonorMedicalReport> {
        let report = self
            .modify(
                report_id,
                Box::new(|report: &mut DonorMedicalReport| {
                    report.is_approved = false;
                    report.health_status = Some(UNFIT.to_string());
                    Ok(())
                }),
            )
            .await?;

        log_report_transition!("reject", report);
        Ok(report)
    }

    /// Append a notes entry to the report
    ///
    /// The entry replaces empty notes and otherwise follows the existing text
    /// after a blank line.
    ///
    /// # Errors
    ///
    /// [`ReviewError::Validation`] when the entry is blank, too long, or would
    /// push the accumulated notes past the length limit.
    /// [`ReviewError::NotFound`] when no report has `report_id`.
    pub async fn add_medical_notes(
        &self,
        report_id: ReportId,
        notes: Option<String>,
    ) -> Result<DonorMedicalReport> {
        validate_notes_entry(notes.as_deref())?;
        let entry = notes.unwrap_or_default();

        let report = self
            .modify(
                report_id,
                Box::new(move |report: &mut DonorMedicalReport| {
                    let combined = append_notes(report.notes_or_empty(), &entry);
                    if char_len(&combined) > MAX_NOTES_CHARS {
                        return Err(ReviewError::invalid_field(
                            "notes",
                            "Accumulated medical notes must not exceed 1000 characters",
                        ));
                    }
                    report.doctor_notes = Some(combined);
                    Ok(())
                }),
            )
            .await?;

        log_report_transition!("add-notes", report);
        Ok(report)
    }

    /// The donor's earliest report
    pub async fn get_medical_report(&self, donor_id: DonorId) -> Result<DonorMedicalReport> {
        self.reports
            .find_by_donor_id(donor_id)
            .await?
            .ok_or_else(|| ReviewError::report_not_found_for_donor(donor_id))
    }

    /// The donor's most recently created report
    pub async fn get_latest_medical_report(&self, donor_id: DonorId) -> Result<DonorMedicalReport> {
        self.reports
            .find_latest_by_donor_id(donor_id)
            .await?
            .ok_or_else(|| ReviewError::no_latest_report_for_donor(donor_id))
    }

    pub async fn get_medical_reports_by_doctor(
        &self,
        doctor_id: DoctorId,
    ) -> Result<Vec<DonorMedicalReport>> {
        self.reports.find_by_doctor_id(doctor_id).await
    }

    pub async fn get_approved_medical_reports(&self) -> Result<Vec<DonorMedicalReport>> {
        self.reports.find_by_approval(true).await
    }

    pub async fn get_unapproved_medical_reports(&self) -> Result<Vec<DonorMedicalReport>> {
        self.reports.find_by_approval(false).await
    }

    pub async fn get_medical_reports_by_health_status(
        &self,
        health_status: &str,
    ) -> Result<Vec<DonorMedicalReport>> {
        self.reports.find_by_health_status(health_status).await
    }

    /// Reports with an appointment in `[start, end]`
    ///
    /// # Errors
    ///
    /// [`ReviewError::Validation`] when `start` is after `end`.
    pub async fn get_medical_reports_by_appointment_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DonorMedicalReport>> {
        if start > end {
            return Err(ReviewError::invalid_field(
                "start",
                "Start of the appointment range must not be after its end",
            ));
        }
        self.reports.find_by_appointment_range(start, end).await
    }

    /// The donor's report for one exact appointment
    pub async fn get_medical_report_for_appointment(
        &self,
        donor_id: DonorId,
        appointment_date: DateTime<Utc>,
    ) -> Result<DonorMedicalReport> {
        self.reports
            .find_by_donor_id_and_appointment_date(donor_id, appointment_date)
            .await?
            .ok_or_else(|| ReviewError::report_not_found_for_donor(donor_id))
    }

    /// Validate and insert a new report
    ///
    /// # Errors
    ///
    /// [`ReviewError::Validation`] for field violations,
    /// [`ReviewError::Referential`] for an unknown donor or doctor.
    pub async fn create_medical_report(
        &self,
        payload: MedicalReportPayload,
    ) -> Result<DonorMedicalReport> {
        let new_report = payload.validate()?;
        let report = self.reports.insert(new_report).await?;

        log_report_transition!("create", report);
        Ok(report)
    }

    /// Validate the payload and write it over the existing report
    ///
    /// `created_at` is kept; identifiers and timestamps in the payload are
    /// ignored.
    pub async fn update_medical_report(
        &self,
        report_id: ReportId,
        payload: MedicalReportPayload,
    ) -> Result<DonorMedicalReport> {
        let new_report = payload.validate()?;
        let report = self
            .modify(
                report_id,
                Box::new(move |report: &mut DonorMedicalReport| {
                    report.apply(new_report);
                    Ok(())
                }),
            )
            .await?;

        log_report_transition!("update", report);
        Ok(report)
    }

    /// # Errors
    ///
    /// [`ReviewError::NotFound`] when no report has `report_id`.
    pub async fn delete_medical_report(&self, report_id: ReportId) -> Result<()> {
        if !self.reports.exists_by_id(report_id).await? {
            return Err(ReviewError::report_not_found(report_id));
        }
        // A concurrent delete can win between the two calls.
        if !self.reports.delete_by_id(report_id).await? {
            return Err(ReviewError::report_not_found(report_id));
        }

        tracing::info!(action = "delete", report_id = %report_id, "Medical report deleted");
        Ok(())
    }

    pub async fn has_medical_report(&self, donor_id: DonorId) -> Result<bool> {
        Ok(self.reports.find_by_donor_id(donor_id).await?.is_some())
    }

    /// Report counts for a doctor; zeros when the doctor has none
    pub async fn get_doctor_statistics(&self, doctor_id: DoctorId) -> Result<DoctorStatistics> {
        let total = self.reports.count_by_doctor_id(doctor_id).await?;
        let approved = self.reports.count_by_doctor_id_and_approved(doctor_id).await?;
        Ok(DoctorStatistics::from_counts(total, approved))
    }

    async fn modify(
        &self,
        report_id: ReportId,
        mutation: ReportMutation,
    ) -> Result<DonorMedicalReport> {
        self.reports
            .modify(report_id, mutation)
            .await?
            .ok_or_else(|| ReviewError::report_not_found(report_id))
    }
}
