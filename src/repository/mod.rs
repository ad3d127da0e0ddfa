use crate::error::RepoResult;
use crate::models::{
    Appointment, AppointmentStatus, BlogPost, BlogStatus, CreateAppointmentRequest,
    CreateBlogPostRequest, CreateDepartmentRequest, CreateTreatmentRequest, CreateVideoRequest,
    DashboardStats, Department, Profile, Treatment, UpdateBlogPostRequest,
    UpdateDepartmentRequest, UpdateProfileRequest, UpdateTreatmentRequest, UpdateVideoRequest,
    Video,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

mod memory;
mod postgres;

pub use memory::MemoryRepository;
pub use postgres::PostgresRepository;

// --- Query Filters ---

/// TreatmentFilter
#[derive(Debug, Clone, Default)]
pub struct TreatmentFilter {
    pub department_id: Option<Uuid>,
    /// Admin listings see disabled rows; public ones never do.
    pub include_inactive: bool,
}

/// BlogFilter
#[derive(Debug, Clone, Default)]
pub struct BlogFilter {
    pub status: Option<BlogStatus>,
    pub category: Option<String>,
    pub department_id: Option<Uuid>,
    pub treatment_id: Option<Uuid>,
    pub limit: Option<i64>,
}

impl BlogFilter {
    /// Filter used by every public read: published posts only.
    pub fn published() -> Self {
        Self {
            status: Some(BlogStatus::Published),
            ..Self::default()
        }
    }
}

/// VideoFilter
///
/// When both `department_id` and `treatment_id` are set, a video linked to either
/// matches.
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    pub department_id: Option<Uuid>,
    pub treatment_id: Option<Uuid>,
    pub include_inactive: bool,
    /// Restrict to `show_global` videos (unscoped public pages).
    pub global_only: bool,
}

/// Repository Trait
///
/// Abstract contract for all persistence operations. Handlers only see this trait,
/// so the Postgres store and the in-memory store are interchangeable.
///
/// Methods returning `Option`/`bool` use `None`/`false` for "no such row".
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Departments ---
    async fn list_departments(&self, include_inactive: bool) -> RepoResult<Vec<Department>>;
    async fn get_department(&self, id: Uuid) -> RepoResult<Option<Department>>;
    async fn get_department_by_slug(
        &self,
        slug: &str,
        include_inactive: bool,
    ) -> RepoResult<Option<Department>>;
    // A missing `display_order` appends the department after the current last one.
    async fn create_department(
        &self,
        slug: String,
        req: CreateDepartmentRequest,
    ) -> RepoResult<Department>;
    async fn update_department(
        &self,
        id: Uuid,
        req: UpdateDepartmentRequest,
    ) -> RepoResult<Option<Department>>;
    async fn set_department_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> RepoResult<Option<Department>>;
    // Treatments keep existing with `department_id` cleared.
    async fn delete_department(&self, id: Uuid) -> RepoResult<bool>;
    async fn reorder_departments(&self, ids: &[Uuid]) -> RepoResult<()>;

    // --- Treatments ---
    async fn list_treatments(&self, filter: TreatmentFilter) -> RepoResult<Vec<Treatment>>;
    async fn get_treatment(&self, id: Uuid) -> RepoResult<Option<Treatment>>;
    async fn get_treatment_by_slug(
        &self,
        slug: &str,
        include_inactive: bool,
    ) -> RepoResult<Option<Treatment>>;
    async fn create_treatment(
        &self,
        slug: String,
        req: CreateTreatmentRequest,
    ) -> RepoResult<Treatment>;
    async fn update_treatment(
        &self,
        id: Uuid,
        req: UpdateTreatmentRequest,
    ) -> RepoResult<Option<Treatment>>;
    async fn set_treatment_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> RepoResult<Option<Treatment>>;
    async fn delete_treatment(&self, id: Uuid) -> RepoResult<bool>;
    async fn reorder_treatments(&self, ids: &[Uuid]) -> RepoResult<()>;

    // --- Blog Posts ---
    async fn list_blog_posts(&self, filter: BlogFilter) -> RepoResult<Vec<BlogPost>>;
    async fn get_blog_post(&self, id: Uuid) -> RepoResult<Option<BlogPost>>;
    async fn get_blog_post_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> RepoResult<Option<BlogPost>>;
    async fn create_blog_post(
        &self,
        slug: String,
        author_id: Uuid,
        req: CreateBlogPostRequest,
    ) -> RepoResult<BlogPost>;
    async fn update_blog_post(
        &self,
        id: Uuid,
        req: UpdateBlogPostRequest,
    ) -> RepoResult<Option<BlogPost>>;
    // Publishing stamps `published_at` the first time only.
    async fn set_blog_status(&self, id: Uuid, status: BlogStatus)
    -> RepoResult<Option<BlogPost>>;
    async fn delete_blog_post(&self, id: Uuid) -> RepoResult<bool>;

    // --- Videos ---
    async fn list_videos(&self, filter: VideoFilter) -> RepoResult<Vec<Video>>;
    async fn get_video(&self, id: Uuid) -> RepoResult<Option<Video>>;
    async fn create_video(&self, req: CreateVideoRequest) -> RepoResult<Video>;
    async fn update_video(&self, id: Uuid, req: UpdateVideoRequest) -> RepoResult<Option<Video>>;
    async fn set_video_active(&self, id: Uuid, is_active: bool) -> RepoResult<Option<Video>>;
    async fn delete_video(&self, id: Uuid) -> RepoResult<bool>;
    async fn reorder_videos(&self, ids: &[Uuid]) -> RepoResult<()>;

    // --- Profiles ---
    async fn get_profile(&self, id: Uuid) -> RepoResult<Option<Profile>>;
    async fn list_profiles(&self) -> RepoResult<Vec<Profile>>;
    // Mirrors an identity-provider user into `profiles`.
    async fn create_profile(&self, profile: Profile) -> RepoResult<Profile>;
    async fn update_profile(
        &self,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> RepoResult<Option<Profile>>;
    async fn delete_profile(&self, id: Uuid) -> RepoResult<bool>;

    // --- Appointments ---
    async fn create_appointment(&self, req: CreateAppointmentRequest) -> RepoResult<Appointment>;
    async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
    ) -> RepoResult<Vec<Appointment>>;
    async fn set_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> RepoResult<Option<Appointment>>;
    async fn delete_appointment(&self, id: Uuid) -> RepoResult<bool>;

    // --- Dashboard ---
    async fn get_dashboard_stats(&self) -> RepoResult<DashboardStats>;
}

/// RepositoryState
///
/// The shared handle to the persistence layer stored in `AppState`.
pub type RepositoryState = Arc<dyn Repository>;
