use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;
use validator::Validate;

use super::ContentScope;
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{CreateVideoRequest, ReorderRequest, UpdateVideoRequest, Video},
    repository::VideoFilter,
};

/// admin_list_videos
///
/// [Admin Route] All videos, disabled ones included. Unlike the public listing an
/// unscoped request returns every video, not only global ones.
#[utoipa::path(
    get,
    path = "/admin/videos",
    params(ContentScope),
    responses((status = 200, description = "All videos", body = [Video]))
)]
pub async fn admin_list_videos(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(scope): Query<ContentScope>,
) -> AppResult<Json<Vec<Video>>> {
    let filter = VideoFilter {
        department_id: scope.department_id,
        treatment_id: scope.treatment_id,
        include_inactive: true,
        global_only: false,
    };
    Ok(Json(state.repo.list_videos(filter).await?))
}

/// admin_get_video
#[utoipa::path(
    get,
    path = "/admin/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Found", body = Video),
        (status = 404, description = "Not Found")
    )
)]
pub async fn admin_get_video(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Video>> {
    state
        .repo
        .get_video(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("video"))
}

/// create_video
///
/// [Admin Route] Unknown department or treatment ids in the link lists are a 400.
#[utoipa::path(
    post,
    path = "/admin/videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Created", body = Video),
        (status = 400, description = "Invalid payload or unknown link target")
    )
)]
pub async fn create_video(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateVideoRequest>,
) -> AppResult<(StatusCode, Json<Video>)> {
    payload.validate()?;

    let video = state.repo.create_video(payload).await?;
    tracing::info!(video_id = %video.id, by = %user.id, "Video created");
    Ok((StatusCode::CREATED, Json(video)))
}

/// update_video
///
/// [Admin Route] Link lists that are present replace the current links.
#[utoipa::path(
    put,
    path = "/admin/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    request_body = UpdateVideoRequest,
    responses(
        (status = 200, description = "Updated", body = Video),
        (status = 400, description = "Invalid payload or unknown link target"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_video(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVideoRequest>,
) -> AppResult<Json<Video>> {
    payload.validate()?;

    state
        .repo
        .update_video(id, payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("video"))
}

/// set_video_status
#[utoipa::path(
    put,
    path = "/admin/videos/{id}/status",
    params(("id" = Uuid, Path, description = "Video ID")),
    request_body = bool,
    responses(
        (status = 200, description = "Updated", body = Video),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_video_status(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(is_active): Json<bool>,
) -> AppResult<Json<Video>> {
    state
        .repo
        .set_video_active(id, is_active)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("video"))
}

/// delete_video
#[utoipa::path(
    delete,
    path = "/admin/videos/{id}",
    params(("id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_video(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.repo.delete_video(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("video"))
    }
}

/// reorder_videos
#[utoipa::path(
    put,
    path = "/admin/videos/order",
    request_body = ReorderRequest,
    responses((status = 204, description = "Reordered"))
)]
pub async fn reorder_videos(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<ReorderRequest>,
) -> AppResult<StatusCode> {
    state.repo.reorder_videos(&payload.ids).await?;
    Ok(StatusCode::NO_CONTENT)
}
