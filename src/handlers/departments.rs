use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{CreateDepartmentRequest, Department, ReorderRequest, UpdateDepartmentRequest},
    slug::{normalize_update_slug, resolve_slug},
};

/// admin_list_departments
///
/// [Admin Route] Every department, disabled ones included.
#[utoipa::path(
    get,
    path = "/admin/departments",
    responses((status = 200, description = "All departments", body = [Department]))
)]
pub async fn admin_list_departments(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Department>>> {
    Ok(Json(state.repo.list_departments(true).await?))
}

/// admin_get_department
#[utoipa::path(
    get,
    path = "/admin/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Found", body = Department),
        (status = 404, description = "Not Found")
    )
)]
pub async fn admin_get_department(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Department>> {
    state
        .repo
        .get_department(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("department"))
}

/// create_department
///
/// [Admin Route] The slug falls back to the name when omitted.
#[utoipa::path(
    post,
    path = "/admin/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Created", body = Department),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn create_department(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateDepartmentRequest>,
) -> AppResult<(StatusCode, Json<Department>)> {
    payload.validate()?;
    let slug = resolve_slug(payload.slug.as_deref(), &payload.name)?;

    let department = state.repo.create_department(slug, payload).await?;
    tracing::info!(department_id = %department.id, slug = %department.slug, by = %user.id, "Department created");
    Ok((StatusCode::CREATED, Json(department)))
}

/// update_department
#[utoipa::path(
    put,
    path = "/admin/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = UpdateDepartmentRequest,
    responses(
        (status = 200, description = "Updated", body = Department),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn update_department(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateDepartmentRequest>,
) -> AppResult<Json<Department>> {
    payload.validate()?;
    normalize_update_slug(&mut payload.slug)?;

    state
        .repo
        .update_department(id, payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("department"))
}

/// set_department_status
///
/// [Admin Route] Enables (`true`) or disables (`false`) a department. Disabled
/// departments disappear from the public site but keep their treatments.
#[utoipa::path(
    put,
    path = "/admin/departments/{id}/status",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = bool,
    responses(
        (status = 200, description = "Updated", body = Department),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_department_status(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(is_active): Json<bool>,
) -> AppResult<Json<Department>> {
    state
        .repo
        .set_department_active(id, is_active)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("department"))
}

/// delete_department
///
/// [Admin Route] Treatments that belonged to the department are kept, unassigned.
#[utoipa::path(
    delete,
    path = "/admin/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_department(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.repo.delete_department(id).await? {
        return Err(AppError::NotFound("department"));
    }
    tracing::info!(department_id = %id, by = %user.id, "Department deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// reorder_departments
///
/// [Admin Route] Sets `display_order` to each id's position in the list.
#[utoipa::path(
    put,
    path = "/admin/departments/order",
    request_body = ReorderRequest,
    responses((status = 204, description = "Reordered"))
)]
pub async fn reorder_departments(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    state.repo.reorder_departments(&payload.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
