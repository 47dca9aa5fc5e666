//! Doctor directory handlers under `/api/doctor/doctors`

use super::error::{ApiResult, WithPath};
use super::extract::{JsonBody, PathParam};
use super::AppState;
use crate::domain::{Doctor, DoctorId, DoctorPayload};
use axum::extract::{OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list_doctors(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<Vec<Doctor>>> {
    let doctors = state.directory.list_doctors().await.at(&uri)?;
    Ok(Json(doctors))
}

pub async fn create_doctor(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    JsonBody(payload): JsonBody<DoctorPayload>,
) -> ApiResult<(StatusCode, Json<Doctor>)> {
    let doctor = state.directory.create_doctor(payload).await.at(&uri)?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

pub async fn get_doctor(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(doctor_id): PathParam<DoctorId>,
) -> ApiResult<Json<Doctor>> {
    let doctor = state.directory.get_doctor(doctor_id).await.at(&uri)?;
    Ok(Json(doctor))
}

pub async fn update_doctor(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(doctor_id): PathParam<DoctorId>,
    JsonBody(payload): JsonBody<DoctorPayload>,
) -> ApiResult<Json<Doctor>> {
    let doctor = state
        .directory
        .update_doctor(doctor_id, payload)
        .await
        .at(&uri)?;
    Ok(Json(doctor))
}

pub async fn delete_doctor(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    PathParam(doctor_id): PathParam<DoctorId>,
) -> ApiResult<StatusCode> {
    state.directory.delete_doctor(doctor_id).await.at(&uri)?;
    Ok(StatusCode::NO_CONTENT)
}
