//! Report and statistics handlers under `/api/doctor`

use super::error::{ApiResult, WithPath};
use super::extract::{JsonBody, PathParam, QueryParams};
use super::AppState;
use crate::domain::{
    timestamp, DoctorId, DoctorStatistics, DonorId, DonorMedicalReport, MedicalReportPayload,
    ReportId,
};
use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body of `PUT /reports/{id}/add-notes`
#[derive(Debug, Default, Deserialize)]
pub struct MedicalNotesRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// Query of `GET /reports/appointments`
#[derive(Debug, Deserialize)]
pub struct AppointmentRange {
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub start: DateTime<Utc>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub end: DateTime<Utc>,
}

type ReportResponse = ApiResult<Json<DonorMedicalReport>>;
type ReportListResponse = ApiResult<Json<Vec<DonorMedicalReport>>>;

pub async fn approve_donation(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(report_id): PathParam<ReportId>,
) -> ReportResponse {
    let report = state
        .doctor_service
        .approve_donation(report_id)
        .await
        .at(&uri)?;
    Ok(Json(report))
}

pub async fn reject_donation(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(report_id): PathParam<ReportId>,
) -> ReportResponse {
    let report = state
        .doctor_service
        .reject_donation(report_id)
        .await
        .at(&uri)?;
    Ok(Json(report))
}

pub async fn add_medical_notes(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(report_id): PathParam<ReportId>,
    JsonBody(request): JsonBody<MedicalNotesRequest>,
) -> ReportResponse {
    let report = state
        .doctor_service
        .add_medical_notes(report_id, request.notes)
        .await
        .at(&uri)?;
    Ok(Json(report))
}

pub async fn get_medical_report(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(donor_id): PathParam<DonorId>,
) -> ReportResponse {
    let report = state
        .doctor_service
        .get_medical_report(donor_id)
        .await
        .at(&uri)?;
    Ok(Json(report))
}

pub async fn get_latest_medical_report(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(donor_id): PathParam<DonorId>,
) -> ReportResponse {
    let report = state
        .doctor_service
        .get_latest_medical_report(donor_id)
        .await
        .at(&uri)?;
    Ok(Json(report))
}

pub async fn has_medical_report(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(donor_id): PathParam<DonorId>,
) -> ApiResult<Json<bool>> {
    let exists = state
        .doctor_service
        .has_medical_report(donor_id)
        .await
        .at(&uri)?;
    Ok(Json(exists))
}

pub async fn get_reports_by_doctor(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(doctor_id): PathParam<DoctorId>,
) -> ReportListResponse {
    let reports = state
        .doctor_service
        .get_medical_reports_by_doctor(doctor_id)
        .await
        .at(&uri)?;
    Ok(Json(reports))
}

pub async fn get_approved_reports(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> ReportListResponse {
    let reports = state
        .doctor_service
        .get_approved_medical_reports()
        .await
        .at(&uri)?;
    Ok(Json(reports))
}

pub async fn get_unapproved_reports(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> ReportListResponse {
    let reports = state
        .doctor_service
        .get_unapproved_medical_reports()
        .await
        .at(&uri)?;
    Ok(Json(reports))
}

pub async fn get_reports_by_health_status(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(health_status): PathParam<String>,
) -> ReportListResponse {
    let reports = state
        .doctor_service
        .get_medical_reports_by_health_status(&health_status)
        .await
        .at(&uri)?;
    Ok(Json(reports))
}

pub async fn get_reports_by_appointment_range(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    QueryParams(range): QueryParams<AppointmentRange>,
) -> ReportListResponse {
    let reports = state
        .doctor_service
        .get_medical_reports_by_appointment_range(range.start, range.end)
        .await
        .at(&uri)?;
    Ok(Json(reports))
}

pub async fn create_medical_report(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    JsonBody(payload): JsonBody<MedicalReportPayload>,
) -> ApiResult<(StatusCode, Json<DonorMedicalReport>)> {
    let report = state
        .doctor_service
        .create_medical_report(payload)
        .await
        .at(&uri)?;
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn update_medical_report(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(report_id): PathParam<ReportId>,
    JsonBody(payload): JsonBody<MedicalReportPayload>,
) -> ReportResponse {
    let report = state
        .doctor_service
        .update_medical_report(report_id, payload)
        .await
        .at(&uri)?;
    Ok(Json(report))
}

pub async fn delete_medical_report(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(report_id): PathParam<ReportId>,
) -> ApiResult<StatusCode> {
    state
        .doctor_service
        .delete_medical_report(report_id)
        .await
        .at(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_doctor_statistics(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(doctor_id): PathParam<DoctorId>,
) -> ApiResult<Json<DoctorStatistics>> {
    let statistics = state
        .doctor_service
        .get_doctor_statistics(doctor_id)
        .await
        .at(&uri)?;
    Ok(Json(statistics))
}
