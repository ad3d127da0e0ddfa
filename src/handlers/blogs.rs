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
    models::{BlogPost, BlogStatus, CreateBlogPostRequest, UpdateBlogPostRequest},
    repository::BlogFilter,
    slug::{normalize_update_slug, resolve_slug},
};

/// AdminBlogQuery
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct AdminBlogQuery {
    /// `draft` or `published`; all posts when omitted.
    pub status: Option<BlogStatus>,
}

/// admin_list_blogs
#[utoipa::path(
    get,
    path = "/admin/blogs",
    params(AdminBlogQuery),
    responses((status = 200, description = "Posts", body = [BlogPost]))
)]
pub async fn admin_list_blogs(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AdminBlogQuery>,
) -> AppResult<Json<Vec<BlogPost>>> {
    let filter = BlogFilter {
        status: query.status,
        ..BlogFilter::default()
    };
    Ok(Json(state.repo.list_blog_posts(filter).await?))
}

/// admin_get_blog
#[utoipa::path(
    get,
    path = "/admin/blogs/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = BlogPost),
        (status = 404, description = "Not Found")
    )
)]
pub async fn admin_get_blog(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BlogPost>> {
    state
        .repo
        .get_blog_post(id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("blog post"))
}

/// create_blog
///
/// [Admin Route] The author is the calling staff member. Posts start as drafts unless
/// `status` says otherwise.
#[utoipa::path(
    post,
    path = "/admin/blogs",
    request_body = CreateBlogPostRequest,
    responses(
        (status = 201, description = "Created", body = BlogPost),
        (status = 400, description = "Invalid payload or unknown reference"),
        (status = 409, description = "Slug already in use")
    )
)]
pub async fn create_blog(
    user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateBlogPostRequest>,
) -> AppResult<(StatusCode, Json<BlogPost>)> {
    payload.validate()?;
    let slug = resolve_slug(payload.slug.as_deref(), &payload.title)?;
    ensure_references(&state.repo, payload.department_id, payload.treatment_id).await?;

    let post = state.repo.create_blog_post(slug, user.id, payload).await?;
    tracing::info!(post_id = %post.id, status = %post.status, by = %user.id, "Blog post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// update_blog
#[utoipa::path(
    put,
    path = "/admin/blogs/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = UpdateBlogPostRequest,
    responses(
        (status = 200, description = "Updated", body = BlogPost),
        (status = 400, description = "Invalid payload or unknown reference"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update_blog(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateBlogPostRequest>,
) -> AppResult<Json<BlogPost>> {
    payload.validate()?;
    normalize_update_slug(&mut payload.slug)?;
    ensure_references(&state.repo, payload.department_id, payload.treatment_id).await?;

    state
        .repo
        .update_blog_post(id, payload)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("blog post"))
}

/// set_blog_status
///
/// [Admin Route] Publishes or unpublishes a post. `published_at` is set on the first
/// publish and kept afterwards.
#[utoipa::path(
    put,
    path = "/admin/blogs/{id}/status",
    params(("id" = Uuid, Path, description = "Post ID")),
    request_body = BlogStatus,
    responses(
        (status = 200, description = "Updated", body = BlogPost),
        (status = 404, description = "Not Found")
    )
)]
pub async fn set_blog_status(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(status): Json<BlogStatus>,
) -> AppResult<Json<BlogPost>> {
    let post = state
        .repo
        .set_blog_status(id, status)
        .await?
        .ok_or(AppError::NotFound("blog post"))?;
    tracing::info!(post_id = %id, status = status.as_str(), by = %user.id, "Blog status changed");
    Ok(Json(post))
}

/// delete_blog
#[utoipa::path(
    delete,
    path = "/admin/blogs/{id}",
    params(("id" = Uuid, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_blog(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if state.repo.delete_blog_post(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("blog post"))
    }
}
