use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use super::{ContentScope, DepartmentScope, MAX_PAGE_SIZE};
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{BlogPost, Department, DepartmentDetail, Profile, Treatment, TreatmentDetail, Video},
    repository::{BlogFilter, TreatmentFilter, VideoFilter},
};

/// PublicBlogQuery
///
/// Filters for the public blog listing. Only published posts are ever returned.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PublicBlogQuery {
    pub category: Option<String>,
    pub department_id: Option<Uuid>,
    pub treatment_id: Option<Uuid>,
    /// Clamped to 1..=100.
    pub limit: Option<i64>,
}

/// list_departments
///
/// [Public Route] Active departments in display order.
#[utoipa::path(
    get,
    path = "/departments",
    responses((status = 200, description = "Active departments", body = [Department]))
)]
pub async fn list_departments(State(state): State<AppState>) -> AppResult<Json<Vec<Department>>> {
    Ok(Json(state.repo.list_departments(false).await?))
}

/// get_department_page
///
/// [Public Route] A department with its active treatments, active linked videos and
/// published posts. Disabled departments are 404.
#[utoipa::path(
    get,
    path = "/departments/{slug}",
    params(("slug" = String, Path, description = "Department slug")),
    responses(
        (status = 200, description = "Department page", body = DepartmentDetail),
        (status = 404, description = "Not found or disabled")
    )
)]
pub async fn get_department_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DepartmentDetail>> {
    let department = state
        .repo
        .get_department_by_slug(&slug, false)
        .await?
        .ok_or(AppError::NotFound("department"))?;

    let treatments = state
        .repo
        .list_treatments(TreatmentFilter {
            department_id: Some(department.id),
            include_inactive: false,
        })
        .await?;
    let videos = state
        .repo
        .list_videos(VideoFilter {
            department_id: Some(department.id),
            ..VideoFilter::default()
        })
        .await?;
    let posts = state
        .repo
        .list_blog_posts(BlogFilter {
            department_id: Some(department.id),
            ..BlogFilter::published()
        })
        .await?;

    Ok(Json(DepartmentDetail {
        department,
        treatments,
        videos,
        posts,
    }))
}

/// list_treatments
///
/// [Public Route] Active treatments, optionally restricted to one department.
#[utoipa::path(
    get,
    path = "/treatments",
    params(DepartmentScope),
    responses((status = 200, description = "Active treatments", body = [Treatment]))
)]
pub async fn list_treatments(
    State(state): State<AppState>,
    Query(scope): Query<DepartmentScope>,
) -> AppResult<Json<Vec<Treatment>>> {
    let filter = TreatmentFilter {
        department_id: scope.department_id,
        include_inactive: false,
    };
    Ok(Json(state.repo.list_treatments(filter).await?))
}

/// get_treatment_page
///
/// [Public Route] A treatment with its department (only when that department is
/// active), linked videos and posts tagged with the treatment.
#[utoipa::path(
    get,
    path = "/treatments/{slug}",
    params(("slug" = String, Path, description = "Treatment slug")),
    responses(
        (status = 200, description = "Treatment page", body = TreatmentDetail),
        (status = 404, description = "Not found or disabled")
    )
)]
pub async fn get_treatment_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<TreatmentDetail>> {
    let treatment = state
        .repo
        .get_treatment_by_slug(&slug, false)
        .await?
        .ok_or(AppError::NotFound("treatment"))?;

    let department = match treatment.department_id {
        Some(id) => state.repo.get_department(id).await?.filter(|d| d.is_active),
        None => None,
    };
    let videos = state
        .repo
        .list_videos(VideoFilter {
            treatment_id: Some(treatment.id),
            ..VideoFilter::default()
        })
        .await?;
    let posts = state
        .repo
        .list_blog_posts(BlogFilter {
            treatment_id: Some(treatment.id),
            ..BlogFilter::published()
        })
        .await?;

    Ok(Json(TreatmentDetail {
        treatment,
        department,
        videos,
        posts,
    }))
}

/// list_blogs
///
/// [Public Route] Published posts, newest first.
#[utoipa::path(
    get,
    path = "/blogs",
    params(PublicBlogQuery),
    responses((status = 200, description = "Published posts", body = [BlogPost]))
)]
pub async fn list_blogs(
    State(state): State<AppState>,
    Query(query): Query<PublicBlogQuery>,
) -> AppResult<Json<Vec<BlogPost>>> {
    let filter = BlogFilter {
        category: query.category.filter(|c| !c.trim().is_empty()),
        department_id: query.department_id,
        treatment_id: query.treatment_id,
        limit: query.limit.map(|l| l.clamp(1, MAX_PAGE_SIZE)),
        ..BlogFilter::published()
    };
    Ok(Json(state.repo.list_blog_posts(filter).await?))
}

/// get_blog
///
/// [Public Route] A single published post. Drafts are 404.
#[utoipa::path(
    get,
    path = "/blogs/{slug}",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "Post", body = BlogPost),
        (status = 404, description = "Not found or not published")
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<BlogPost>> {
    state
        .repo
        .get_blog_post_by_slug(&slug, true)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("blog post"))
}

/// list_videos
///
/// [Public Route] Active videos linked to the given department or treatment. Without
/// either filter only videos flagged `show_global` are returned.
#[utoipa::path(
    get,
    path = "/videos",
    params(ContentScope),
    responses((status = 200, description = "Active videos", body = [Video]))
)]
pub async fn list_videos(
    State(state): State<AppState>,
    Query(scope): Query<ContentScope>,
) -> AppResult<Json<Vec<Video>>> {
    let unscoped = scope.department_id.is_none() && scope.treatment_id.is_none();
    let filter = VideoFilter {
        department_id: scope.department_id,
        treatment_id: scope.treatment_id,
        include_inactive: false,
        global_only: unscoped,
    };
    Ok(Json(state.repo.list_videos(filter).await?))
}

/// get_me
///
/// [Authenticated Route] The caller's own profile.
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 401, description = "No valid session")
    )
)]
pub async fn get_me(user: AuthUser, State(state): State<AppState>) -> AppResult<Json<Profile>> {
    state
        .repo
        .get_profile(user.id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("profile"))
}
