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
    models::{InviteUserRequest, Profile, Role, UpdateProfileRequest},
};

/// list_users
///
/// [Super Admin Route] Every staff profile.
#[utoipa::path(
    get,
    path = "/admin/users",
    responses((status = 200, description = "Staff profiles", body = [Profile]))
)]
pub async fn list_users(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Profile>>> {
    Ok(Json(state.repo.list_profiles().await?))
}

/// get_user
#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Found", body = Profile),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_user(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    state
        .repo
        .get_profile(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("profile"))
}

/// invite_user
///
/// [Super Admin Route] Creates the login in the identity provider, then mirrors it into
/// `profiles` under the same id. If the profile write fails the new login is removed
/// again so the two stores do not drift apart.
#[utoipa::path(
    post,
    path = "/admin/users",
    request_body = InviteUserRequest,
    responses(
        (status = 201, description = "Invited", body = Profile),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn invite_user(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<InviteUserRequest>,
) -> AppResult<(StatusCode, Json<Profile>)> {
    payload.validate()?;

    let id = state
        .identity
        .create_user(&payload.email, &payload.password)
        .await?;

    let profile = Profile {
        id,
        email: payload.email,
        full_name: payload.full_name,
        role: payload.role.as_str().to_string(),
        is_active: true,
        ..Profile::default()
    };

    let created = match state.repo.create_profile(profile).await {
        Ok(created) => created,
        Err(e) => {
            if let Err(cleanup) = state.identity.delete_user(id).await {
                tracing::error!(user_id = %id, error = %cleanup, "Failed to roll back identity user");
            }
            return Err(e.into());
        }
    };

    tracing::info!(user_id = %created.id, role = %created.role, by = %user.id, "Staff member invited");
    Ok((StatusCode::CREATED, Json(created)))
}

/// update_user
///
/// [Super Admin Route] Changes name, role, active flag or avatar. A super admin cannot
/// disable or demote their own account.
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated", body = Profile),
        (status = 403, description = "Self-demotion or self-disable"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<Profile>> {
    if id == user.id {
        if payload.is_active == Some(false) {
            return Err(AppError::Forbidden("you cannot disable your own account".to_string()));
        }
        if payload.role.is_some_and(|role| role != Role::SuperAdmin) {
            return Err(AppError::Forbidden("you cannot change your own role".to_string()));
        }
    }

    let profile = state
        .repo
        .update_profile(id, payload)
        .await?
        .ok_or(AppError::NotFound("profile"))?;
    tracing::info!(user_id = %id, role = %profile.role, active = profile.is_active, by = %user.id, "Staff profile updated");
    Ok(Json(profile))
}

/// delete_user
///
/// [Super Admin Route] Removes the login from the identity provider and the profile.
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Self-deletion"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_user(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if id == user.id {
        return Err(AppError::Forbidden("you cannot delete your own account".to_string()));
    }
    if state.repo.get_profile(id).await?.is_none() {
        return Err(AppError::NotFound("profile"));
    }

    state.identity.delete_user(id).await?;
    state.repo.delete_profile(id).await?;

    tracing::info!(user_id = %id, by = %user.id, "Staff member removed");
    Ok(StatusCode::NO_CONTENT)
}
