//! Check-in / check-out endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::attendance::{AttendanceRecord, LocationRequest, PresenceResponse},
};

use super::CallerId;

fn validated(body: &LocationRequest) -> AppResult<()> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Check in to an event from the given location
#[utoipa::path(
    post,
    path = "/events/{id}/check-in",
    tag = "attendance",
    params(("id" = i64, Path, description = "Event ID")),
    request_body = LocationRequest,
    responses(
        (status = 201, description = "Checked in", body = AttendanceRecord),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Already checked in"),
        (status = 422, description = "Event not running or outside geofence")
    )
)]
pub async fn check_in(
    State(state): State<crate::AppState>,
    CallerId(user_id): CallerId,
    Path(event_id): Path<i64>,
    Json(body): Json<LocationRequest>,
) -> AppResult<(StatusCode, Json<AttendanceRecord>)> {
    validated(&body)?;
    let record = state
        .services
        .attendance
        .check_in(user_id, event_id, body.point(), Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Check out of an event
#[utoipa::path(
    post,
    path = "/events/{id}/check-out",
    tag = "attendance",
    params(("id" = i64, Path, description = "Event ID")),
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Checked out", body = AttendanceRecord),
        (status = 422, description = "No active check-in")
    )
)]
pub async fn check_out(
    State(state): State<crate::AppState>,
    CallerId(user_id): CallerId,
    Path(event_id): Path<i64>,
    Json(body): Json<LocationRequest>,
) -> AppResult<Json<AttendanceRecord>> {
    validated(&body)?;
    let record = state
        .services
        .attendance
        .check_out(user_id, event_id, body.point(), Utc::now())
        .await?;
    Ok(Json(record))
}

/// Current open session of the caller at an event
#[utoipa::path(
    get,
    path = "/events/{id}/attendance-status",
    tag = "attendance",
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Open attendance record", body = AttendanceRecord),
        (status = 422, description = "User is not checked in")
    )
)]
pub async fn attendance_status(
    State(state): State<crate::AppState>,
    CallerId(user_id): CallerId,
    Path(event_id): Path<i64>,
) -> AppResult<Json<AttendanceRecord>> {
    state
        .services
        .attendance
        .current_session(user_id, event_id)
        .await?
        .map(Json)
        .ok_or(AppError::NoActiveSession)
}

/// Whether the caller is currently present at an event
#[utoipa::path(
    get,
    path = "/events/{id}/presence",
    tag = "attendance",
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Presence flag", body = PresenceResponse)
    )
)]
pub async fn presence(
    State(state): State<crate::AppState>,
    CallerId(user_id): CallerId,
    Path(event_id): Path<i64>,
) -> AppResult<Json<PresenceResponse>> {
    let present = state.services.attendance.is_present(user_id, event_id).await?;
    Ok(Json(PresenceResponse {
        user_id,
        event_id,
        present,
    }))
}

/// All attendance records of an event
#[utoipa::path(
    get,
    path = "/events/{id}/attendances",
    tag = "attendance",
    params(("id" = i64, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Attendance records, latest first", body = Vec<AttendanceRecord>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn list_attendances(
    State(state): State<crate::AppState>,
    _caller: CallerId,
    Path(event_id): Path<i64>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    let records = state.services.attendance.event_attendances(event_id).await?;
    Ok(Json(records))
}
