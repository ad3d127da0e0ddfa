use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::ensure_references;
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{Appointment, AppointmentStatus, CreateAppointmentRequest},
};

/// AppointmentQuery
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct AppointmentQuery {
    pub status: Option<AppointmentStatus>,
}

/// create_appointment
///
/// [Public Route] Stores a booking request as `pending` and announces it.
///
/// The row is written before any notification is attempted. If the email channel is
/// configured and fails, the caller gets a 500 but the request remains visible in the
/// backoffice. The messaging channel never affects the response.
#[utoipa::path(
    post,
    path = "/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Stored and notified", body = Appointment),
        (status = 400, description = "Invalid payload or unknown department/treatment"),
        (status = 500, description = "Stored, but the notification email failed")
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    payload.validate()?;
    if payload.patient_name.trim().is_empty() {
        return Err(AppError::Validation("patient_name must not be empty".to_string()));
    }
    ensure_references(&state.repo, payload.department_id, payload.treatment_id).await?;

    let appointment = state.repo.create_appointment(payload).await?;
    tracing::info!(appointment_id = %appointment.id, "Appointment request stored");

    state.notifier.dispatch(&appointment).await.map_err(|e| {
        AppError::Internal(format!(
            "appointment {} stored but notification failed: {e}",
            appointment.id
        ))
    })?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// list_appointments
///
/// [Admin Route] Newest first, optionally filtered by status.
#[utoipa::path(
    get,
    path = "/admin/appointments",
    params(AppointmentQuery),
    responses((status = 200, description = "Appointments", body = [Appointment]))
)]
pub async fn list_appointments(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AppointmentQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    Ok(Json(state.repo.list_appointments(query.status).await?))
}

/// set_appointment_status
#[utoipa::path(
    put,
    path = "/admin/appointments/{id}/status",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = AppointmentStatus,
    responses(
        (status = 200, description = "Updated", body = Appointment),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_appointment_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(status): Json<AppointmentStatus>,
) -> AppResult<Json<Appointment>> {
    let appointment = state
        .repo
        .set_appointment_status(id, status)
        .await?
        .ok_or(AppError::NotFound("appointment"))?;
    tracing::info!(appointment_id = %id, status = status.as_str(), by = %user.id, "Appointment status changed");
    Ok(Json(appointment))
}

/// delete_appointment
#[utoipa::path(
    delete,
    path = "/admin/appointments/{id}",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_appointment(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.repo.delete_appointment(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("appointment"))
    }
}
