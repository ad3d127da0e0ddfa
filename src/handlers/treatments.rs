use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use super::{DepartmentScope, ensure_references};
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{CreateTreatmentRequest, ReorderRequest, Treatment, UpdateTreatmentRequest},
    repository::TreatmentFilter,
    slug::{normalize_update_slug, resolve_slug},
};

/// admin_list_treatments
///
/// [Admin Route] All treatments including disabled ones, optionally for one department.
#[utoipa::path(
    get,
    path = "/admin/treatments",
    params(DepartmentScope),
    responses((status = 200, description = "All treatments", body = [Treatment]))
)]
pub async fn admin_list_treatments(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(scope): Query<DepartmentScope>,
) -> AppResult<Json<Vec<Treatment>>> {
    let filter = TreatmentFilter {
        department_id: scope.department_id,
        include_inactive: true,
    };
    Ok(Json(state.repo.list_treatments(filter).await?))
}

/// admin_get_treatment
#[utoipa::path(
    get,
    path = "/admin/treatments/{id}",
    params(("id" = Uuid, Path, description = "Treatment ID")),
    responses(
        (status = 200, description = "Found", body = Treatment),
        (status = 404, description = "Not Found")
    )
)]
pub async fn admin_get_treatment(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Treatment>> {
    state
        .repo
        .get_treatment(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("treatment"))
}

/// create_treatment
#[utoipa::path(
    post,
    path = "/admin/treatments",
    request_body = CreateTreatmentRequest,
    responses(
        (status = 201, description = "Created", body = Treatment),
        (status = 400, description = "Invalid payload or unknown department"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn create_treatment(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateTreatmentRequest>,
) -> AppResult<(StatusCode, Json<Treatment>)> {
    payload.validate()?;
    let slug = resolve_slug(payload.slug.as_deref(), &payload.title)?;
    ensure_references(&state.repo, payload.department_id, None).await?;

    let treatment = state.repo.create_treatment(slug, payload).await?;
    tracing::info!(treatment_id = %treatment.id, slug = %treatment.slug, by = %user.id, "Treatment created");
    Ok((StatusCode::CREATED, Json(treatment)))
}

/// update_treatment
#[utoipa::path(
    put,
    path = "/admin/treatments/{id}",
    params(("id" = Uuid, Path, description = "Treatment ID")),
    request_body = UpdateTreatmentRequest,
    responses(
        (status = 200, description = "Updated", body = Treatment),
        (status = 400, description = "Invalid payload or unknown department"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_treatment(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateTreatmentRequest>,
) -> AppResult<Json<Treatment>> {
    payload.validate()?;
    normalize_update_slug(&mut payload.slug)?;
    ensure_references(&state.repo, payload.department_id, None).await?;

    state
        .repo
        .update_treatment(id, payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("treatment"))
}

/// set_treatment_status
#[utoipa::path(
    put,
    path = "/admin/treatments/{id}/status",
    params(("id" = Uuid, Path, description = "Treatment ID")),
    request_body = bool,
    responses(
        (status = 200, description = "Updated", body = Treatment),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_treatment_status(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(is_active): Json<bool>,
) -> AppResult<Json<Treatment>> {
    state
        .repo
        .set_treatment_active(id, is_active)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("treatment"))
}

/// delete_treatment
#[utoipa::path(
    delete,
    path = "/admin/treatments/{id}",
    params(("id" = Uuid, Path, description = "Treatment ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_treatment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_treatment(id).await? {
        return Err(AppError::NotFound("treatment"));
    }
    tracing::info!(treatment_id = %id, by = %user.id, "Treatment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// reorder_treatments
#[utoipa::path(
    put,
    path = "/admin/treatments/order",
    request_body = ReorderRequest,
    responses((status = 204, description = "Reordered"))
)]
pub async fn reorder_treatments(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    state.repo.reorder_treatments(&payload.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
