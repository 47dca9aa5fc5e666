//! PostgreSQL adapter implementing database traits
//!
//! Wraps [`PostgreSQLClient`] and implements [`DatabaseClient`],
//! [`ReportRepository`] and [`DoctorRepository`].

use crate::adapters::database::traits::{
    DatabaseClient, DoctorRepository, ReportMutation, ReportRepository,
};
use crate::adapters::postgresql::client::{map_db_error, PostgreSQLClient};
use crate::adapters::postgresql::models::{
    count_from_row, doctor_from_row, map_rows, report_from_row, DOCTOR_COLUMNS, REPORT_COLUMNS,
};
use crate::domain::report::store_timestamp;
use crate::domain::{
    Doctor, DoctorId, DonorId, DonorMedicalReport, NewDoctor, NewMedicalReport, ReportId, Result,
    ReviewError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Overwrites every editable column. `updated_at` never moves backwards.
const UPDATE_REPORT: &str = "UPDATE donor_medical_reports SET \
     donor_id = $2, doctor_id = $3, doctor_notes = $4, health_status = $5, \
     is_approved = $6, appointment_date = $7, \
     updated_at = GREATEST($8, updated_at + INTERVAL '1 microsecond') \
     WHERE id = $1";

/// PostgreSQL implementation of the repository traits
pub struct PostgreSQLAdapter {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLAdapter {
    /// Create a new PostgreSQL adapter
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }

    async fn report_list(
        &self,
        filter: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<DonorMedicalReport>> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM donor_medical_reports {filter}");
        let rows = self.client.query(&query, params).await?;
        map_rows(&rows, report_from_row)
    }

    async fn report_one(
        &self,
        filter: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Option<DonorMedicalReport>> {
        let query = format!("SELECT {REPORT_COLUMNS} FROM donor_medical_reports {filter}");
        let row = self.client.query_opt(&query, params).await?;
        row.as_ref().map(report_from_row).transpose()
    }

    async fn report_count(
        &self,
        filter: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<u64> {
        let query = format!("SELECT COUNT(*) AS count FROM donor_medical_reports {filter}");
        let rows = self.client.query(&query, params).await?;
        match rows.first() {
            Some(row) => count_from_row(row),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl DatabaseClient for PostgreSQLAdapter {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn register_donor(&self, donor_id: DonorId) -> Result<()> {
        let id = donor_id.value();
        self.client
            .execute(
                "INSERT INTO donors (id) VALUES ($1) ON CONFLICT (id) DO NOTHING",
                &[&id],
            )
            .await?;
        tracing::debug!(donor_id = %donor_id, "Registered donor");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgresql"
    }
}

#[async_trait]
impl ReportRepository for PostgreSQLAdapter {
    async fn find_by_id(&self, id: ReportId) -> Result<Option<DonorMedicalReport>> {
        let id = id.value();
        self.report_one("WHERE id = $1", &[&id]).await
    }

    async fn find_by_donor_id(&self, donor_id: DonorId) -> Result<Option<DonorMedicalReport>> {
        let donor_id = donor_id.value();
        self.report_one(
            "WHERE donor_id = $1 ORDER BY created_at ASC, id ASC LIMIT 1",
            &[&donor_id],
        )
        .await
    }

    async fn find_latest_by_donor_id(
        &self,
        donor_id: DonorId,
    ) -> Result<Option<DonorMedicalReport>> {
        let donor_id = donor_id.value();
        self.report_one(
            "WHERE donor_id = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
            &[&donor_id],
        )
        .await
    }

    async fn find_by_donor_id_and_appointment_date(
        &self,
        donor_id: DonorId,
        appointment_date: DateTime<Utc>,
    ) -> Result<Option<DonorMedicalReport>> {
        let donor_id = donor_id.value();
        self.report_one(
            "WHERE donor_id = $1 AND appointment_date = $2 ORDER BY id ASC LIMIT 1",
            &[&donor_id, &appointment_date],
        )
        .await
    }

    async fn find_by_doctor_id(&self, doctor_id: DoctorId) -> Result<Vec<DonorMedicalReport>> {
        let doctor_id = doctor_id.value();
        self.report_list("WHERE doctor_id = $1 ORDER BY id", &[&doctor_id])
            .await
    }

    async fn find_by_approval(&self, approved: bool) -> Result<Vec<DonorMedicalReport>> {
        self.report_list("WHERE is_approved = $1 ORDER BY id", &[&approved])
            .await
    }

    async fn find_by_health_status(&self, status: &str) -> Result<Vec<DonorMedicalReport>> {
        self.report_list("WHERE health_status = $1 ORDER BY id", &[&status])
            .await
    }

    async fn find_by_appointment_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<DonorMedicalReport>> {
        self.report_list(
            "WHERE appointment_date BETWEEN $1 AND $2 ORDER BY appointment_date, id",
            &[&start, &end],
        )
        .await
    }

    async fn count_by_doctor_id(&self, doctor_id: DoctorId) -> Result<u64> {
        let doctor_id = doctor_id.value();
        self.report_count("WHERE doctor_id = $1", &[&doctor_id]).await
    }

    async fn count_by_doctor_id_and_approved(&self, doctor_id: DoctorId) -> Result<u64> {
        let doctor_id = doctor_id.value();
        self.report_count("WHERE doctor_id = $1 AND is_approved", &[&doctor_id])
            .await
    }

    async fn insert(&self, report: NewMedicalReport) -> Result<DonorMedicalReport> {
        let query = format!(
            "INSERT INTO donor_medical_reports (
                donor_id, doctor_id, doctor_notes, health_status,
                is_approved, appointment_date, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {REPORT_COLUMNS}"
        );

        let donor_id = report.donor_id.value();
        let doctor_id = report.doctor_id.value();
        let now = store_timestamp(None);

        let row = self
            .client
            .query_opt(
                &query,
                &[
                    &donor_id,
                    &doctor_id,
                    &report.doctor_notes,
                    &report.health_status,
                    &report.is_approved,
                    &report.appointment_date,
                    &now,
                ],
            )
            .await?
            .ok_or_else(|| ReviewError::Database("Insert returned no row".to_string()))?;

        let inserted = report_from_row(&row)?;
        tracing::debug!(report_id = %inserted.id, donor_id = %inserted.donor_id, "Inserted medical report");
        Ok(inserted)
    }

    async fn save(&self, report: &DonorMedicalReport) -> Result<Option<DonorMedicalReport>> {
        let query = format!("{UPDATE_REPORT} RETURNING {REPORT_COLUMNS}");
        let id = report.id.value();
        let donor_id = report.donor_id.value();
        let doctor_id = report.doctor_id.value();
        let now = store_timestamp(Some(report.updated_at));

        let row = self
            .client
            .query_opt(
                &query,
                &[
                    &id,
                    &donor_id,
                    &doctor_id,
                    &report.doctor_notes,
                    &report.health_status,
                    &report.is_approved,
                    &report.appointment_date,
                    &now,
                ],
            )
            .await?;
        row.as_ref().map(report_from_row).transpose()
    }

    async fn modify(
        &self,
        id: ReportId,
        mutation: ReportMutation,
    ) -> Result<Option<DonorMedicalReport>> {
        let mut conn = self.client.get_connection().await?;
        let tx = conn
            .transaction()
            .await
            .map_err(|e| map_db_error("Failed to begin transaction", e))?;

        tx.batch_execute(&self.client.statement_timeout_sql(true))
            .await
            .map_err(|e| map_db_error("Failed to set statement timeout", e))?;

        let raw_id = id.value();
        let select = format!("SELECT {REPORT_COLUMNS} FROM donor_medical_reports WHERE id = $1");
        let Some(row) = tx
            .query_opt(select.as_str(), &[&raw_id])
            .await
            .map_err(|e| map_db_error("Query failed", e))?
        else {
            return Ok(None);
        };

        let mut report = report_from_row(&row)?;
        let created_at = report.created_at;
        mutation(&mut report)?;
        report.id = id;
        report.created_at = created_at;

        let update = format!("{UPDATE_REPORT} RETURNING {REPORT_COLUMNS}");
        let donor_id = report.donor_id.value();
        let doctor_id = report.doctor_id.value();
        let now = store_timestamp(Some(report.updated_at));

        let row = tx
            .query_one(
                update.as_str(),
                &[
                    &raw_id,
                    &donor_id,
                    &doctor_id,
                    &report.doctor_notes,
                    &report.health_status,
                    &report.is_approved,
                    &report.appointment_date,
                    &now,
                ],
            )
            .await
            .map_err(|e| map_db_error("Update failed", e))?;
        let updated = report_from_row(&row)?;

        tx.commit()
            .await
            .map_err(|e| map_db_error("Failed to commit transaction", e))?;

        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: ReportId) -> Result<bool> {
        let id = id.value();
        let deleted = self
            .client
            .execute("DELETE FROM donor_medical_reports WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }

    async fn exists_by_id(&self, id: ReportId) -> Result<bool> {
        let id = id.value();
        let row = self
            .client
            .query_opt(
                "SELECT EXISTS (SELECT 1 FROM donor_medical_reports WHERE id = $1) AS found",
                &[&id],
            )
            .await?;

        match row {
            Some(row) => row
                .try_get("found")
                .map_err(|e| ReviewError::Database(format!("Failed to read existence flag: {e}"))),
            None => Ok(false),
        }
    }
}

#[async_trait]
impl DoctorRepository for PostgreSQLAdapter {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor> {
        let query = format!(
            "INSERT INTO doctors (name, specialization) VALUES ($1, $2) RETURNING {DOCTOR_COLUMNS}"
        );
        let row = self
            .client
            .query_opt(&query, &[&doctor.name, &doctor.specialization])
            .await?
            .ok_or_else(|| ReviewError::Database("Insert returned no row".to_string()))?;
        doctor_from_row(&row)
    }

    async fn find_by_id(&self, id: DoctorId) -> Result<Option<Doctor>> {
        let query = format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = $1");
        let id = id.value();
        let row = self.client.query_opt(&query, &[&id]).await?;
        row.as_ref().map(doctor_from_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Doctor>> {
        let query = format!("SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY id");
        let rows = self.client.query(&query, &[]).await?;
        map_rows(&rows, doctor_from_row)
    }

    async fn update(&self, doctor: &Doctor) -> Result<Option<Doctor>> {
        let query = format!(
            "UPDATE doctors SET name = $2, specialization = $3 WHERE id = $1 \
             RETURNING {DOCTOR_COLUMNS}"
        );
        let id = doctor.id.value();
        let row = self
            .client
            .query_opt(&query, &[&id, &doctor.name, &doctor.specialization])
            .await?;
        row.as_ref().map(doctor_from_row).transpose()
    }

    async fn delete_by_id(&self, id: DoctorId) -> Result<bool> {
        let id = id.value();
        let deleted = self
            .client
            .execute("DELETE FROM doctors WHERE id = $1", &[&id])
            .await?;
        Ok(deleted > 0)
    }

    async fn count(&self) -> Result<u64> {
        let rows = self
            .client
            .query("SELECT COUNT(*) AS count FROM doctors", &[])
            .await?;
        match rows.first() {
            Some(row) => count_from_row(row),
            None => Ok(0),
        }
    }
}
