use super::{BlogFilter, Repository, TreatmentFilter, VideoFilter};
use crate::error::{RepoError, RepoResult};
use crate::models::{
    Appointment, AppointmentStatus, BlogPost, BlogStatus, CreateAppointmentRequest,
    CreateBlogPostRequest, CreateDepartmentRequest, CreateTreatmentRequest, CreateVideoRequest,
    DashboardStats, Department, Profile, Treatment, UpdateBlogPostRequest,
    UpdateDepartmentRequest, UpdateProfileRequest, UpdateTreatmentRequest, UpdateVideoRequest,
    Video,
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Store {
    departments: Vec<Department>,
    treatments: Vec<Treatment>,
    posts: Vec<BlogPost>,
    videos: Vec<Video>,
    profiles: Vec<Profile>,
    appointments: Vec<Appointment>,
}

impl Store {
    fn department_exists(&self, id: Option<Uuid>) -> bool {
        id.is_none_or(|id| self.departments.iter().any(|d| d.id == id))
    }

    fn treatment_exists(&self, id: Option<Uuid>) -> bool {
        id.is_none_or(|id| self.treatments.iter().any(|t| t.id == id))
    }

    fn next_order<T>(rows: &[T], order: impl Fn(&T) -> i32) -> i32 {
        rows.iter().map(order).max().map_or(0, |max| max + 1)
    }
}

/// MemoryRepository
///
/// An in-process `Repository` that mirrors the Postgres schema's constraints: unique
/// slugs and emails, foreign keys, `ON DELETE SET NULL` for content and cascading
/// video links. Used by the test suite and for database-less local demos.
#[derive(Default)]
pub struct MemoryRepository {
    store: RwLock<Store>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a profile as-is, keeping its timestamps. Used to seed staff accounts.
    pub async fn seed_profile(&self, profile: Profile) {
        self.store.write().await.profiles.push(profile);
    }
}

fn sort_departments(rows: &mut [Department]) {
    rows.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });
}

fn sort_treatments(rows: &mut [Treatment]) {
    rows.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.title.cmp(&b.title))
    });
}

#[async_trait]
impl Repository for MemoryRepository {
    // --- DEPARTMENTS ---

    async fn list_departments(&self, include_inactive: bool) -> RepoResult<Vec<Department>> {
        let store = self.store.read().await;
        let mut rows: Vec<Department> = store
            .departments
            .iter()
            .filter(|d| include_inactive || d.is_active)
            .cloned()
            .collect();
        sort_departments(&mut rows);
        Ok(rows)
    }

    async fn get_department(&self, id: Uuid) -> RepoResult<Option<Department>> {
        let store = self.store.read().await;
        Ok(store.departments.iter().find(|d| d.id == id).cloned())
    }

    async fn get_department_by_slug(
        &self,
        slug: &str,
        include_inactive: bool,
    ) -> RepoResult<Option<Department>> {
        let store = self.store.read().await;
        Ok(store
            .departments
            .iter()
            .find(|d| d.slug == slug && (include_inactive || d.is_active))
            .cloned())
    }

    async fn create_department(
        &self,
        slug: String,
        req: CreateDepartmentRequest,
    ) -> RepoResult<Department> {
        let mut store = self.store.write().await;
        if store.departments.iter().any(|d| d.slug == slug) {
            return Err(RepoError::Conflict("departments_slug_key".to_string()));
        }
        let now = Utc::now();
        let department = Department {
            id: Uuid::new_v4(),
            name: req.name,
            slug,
            description: req.description,
            icon: req.icon,
            image_url: req.image_url,
            is_active: req.is_active.unwrap_or(true),
            display_order: req
                .display_order
                .unwrap_or_else(|| Store::next_order(&store.departments, |d| d.display_order)),
            created_at: now,
            updated_at: now,
        };
        store.departments.push(department.clone());
        Ok(department)
    }

    async fn update_department(
        &self,
        id: Uuid,
        req: UpdateDepartmentRequest,
    ) -> RepoResult<Option<Department>> {
        let mut store = self.store.write().await;
        if let Some(slug) = &req.slug {
            if store.departments.iter().any(|d| &d.slug == slug && d.id != id) {
                return Err(RepoError::Conflict("departments_slug_key".to_string()));
            }
        }
        let Some(row) = store.departments.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(name) = req.name {
            row.name = name;
        }
        if let Some(slug) = req.slug {
            row.slug = slug;
        }
        if req.description.is_some() {
            row.description = req.description;
        }
        if req.icon.is_some() {
            row.icon = req.icon;
        }
        if req.image_url.is_some() {
            row.image_url = req.image_url;
        }
        if let Some(order) = req.display_order {
            row.display_order = order;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn set_department_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> RepoResult<Option<Department>> {
        let mut store = self.store.write().await;
        Ok(store.departments.iter_mut().find(|d| d.id == id).map(|row| {
            row.is_active = is_active;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete_department(&self, id: Uuid) -> RepoResult<bool> {
        let mut store = self.store.write().await;
        let before = store.departments.len();
        store.departments.retain(|d| d.id != id);
        if store.departments.len() == before {
            return Ok(false);
        }
        for treatment in store.treatments.iter_mut() {
            if treatment.department_id == Some(id) {
                treatment.department_id = None;
            }
        }
        for post in store.posts.iter_mut() {
            if post.department_id == Some(id) {
                post.department_id = None;
            }
        }
        for appointment in store.appointments.iter_mut() {
            if appointment.department_id == Some(id) {
                appointment.department_id = None;
            }
        }
        for video in store.videos.iter_mut() {
            video.department_ids.retain(|d| *d != id);
        }
        Ok(true)
    }

    async fn reorder_departments(&self, ids: &[Uuid]) -> RepoResult<()> {
        let mut store = self.store.write().await;
        for (position, id) in ids.iter().enumerate() {
            if let Some(row) = store.departments.iter_mut().find(|d| d.id == *id) {
                row.display_order = position as i32;
                row.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    // --- TREATMENTS ---

    async fn list_treatments(&self, filter: TreatmentFilter) -> RepoResult<Vec<Treatment>> {
        let store = self.store.read().await;
        let mut rows: Vec<Treatment> = store
            .treatments
            .iter()
            .filter(|t| filter.include_inactive || t.is_active)
            .filter(|t| filter.department_id.is_none() || t.department_id == filter.department_id)
            .cloned()
            .collect();
        sort_treatments(&mut rows);
        Ok(rows)
    }

    async fn get_treatment(&self, id: Uuid) -> RepoResult<Option<Treatment>> {
        let store = self.store.read().await;
        Ok(store.treatments.iter().find(|t| t.id == id).cloned())
    }

    async fn get_treatment_by_slug(
        &self,
        slug: &str,
        include_inactive: bool,
    ) -> RepoResult<Option<Treatment>> {
        let store = self.store.read().await;
        Ok(store
            .treatments
            .iter()
            .find(|t| t.slug == slug && (include_inactive || t.is_active))
            .cloned())
    }

    async fn create_treatment(
        &self,
        slug: String,
        req: CreateTreatmentRequest,
    ) -> RepoResult<Treatment> {
        let mut store = self.store.write().await;
        if store.treatments.iter().any(|t| t.slug == slug) {
            return Err(RepoError::Conflict("treatments_slug_key".to_string()));
        }
        if !store.department_exists(req.department_id) {
            return Err(RepoError::InvalidReference(
                "treatments_department_id_fkey".to_string(),
            ));
        }
        let now = Utc::now();
        let treatment = Treatment {
            id: Uuid::new_v4(),
            title: req.title,
            slug,
            summary: req.summary,
            content: req.content,
            category: req.category,
            department_id: req.department_id,
            youtube_url: req.youtube_url,
            is_active: req.is_active.unwrap_or(true),
            display_order: req
                .display_order
                .unwrap_or_else(|| Store::next_order(&store.treatments, |t| t.display_order)),
            meta_title: req.meta_title,
            meta_description: req.meta_description,
            created_at: now,
            updated_at: now,
        };
        store.treatments.push(treatment.clone());
        Ok(treatment)
    }

    async fn update_treatment(
        &self,
        id: Uuid,
        req: UpdateTreatmentRequest,
    ) -> RepoResult<Option<Treatment>> {
        let mut store = self.store.write().await;
        if let Some(slug) = &req.slug {
            if store.treatments.iter().any(|t| &t.slug == slug && t.id != id) {
                return Err(RepoError::Conflict("treatments_slug_key".to_string()));
            }
        }
        if !store.department_exists(req.department_id) {
            return Err(RepoError::InvalidReference(
                "treatments_department_id_fkey".to_string(),
            ));
        }
        let Some(row) = store.treatments.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        if let Some(title) = req.title {
            row.title = title;
        }
        if let Some(slug) = req.slug {
            row.slug = slug;
        }
        if req.summary.is_some() {
            row.summary = req.summary;
        }
        if req.content.is_some() {
            row.content = req.content;
        }
        if req.category.is_some() {
            row.category = req.category;
        }
        if req.department_id.is_some() {
            row.department_id = req.department_id;
        }
        if req.youtube_url.is_some() {
            row.youtube_url = req.youtube_url;
        }
        if let Some(order) = req.display_order {
            row.display_order = order;
        }
        if req.meta_title.is_some() {
            row.meta_title = req.meta_title;
        }
        if req.meta_description.is_some() {
            row.meta_description = req.meta_description;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn set_treatment_active(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> RepoResult<Option<Treatment>> {
        let mut store = self.store.write().await;
        Ok(store.treatments.iter_mut().find(|t| t.id == id).map(|row| {
            row.is_active = is_active;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete_treatment(&self, id: Uuid) -> RepoResult<bool> {
        let mut store = self.store.write().await;
        let before = store.treatments.len();
        store.treatments.retain(|t| t.id != id);
        if store.treatments.len() == before {
            return Ok(false);
        }
        for post in store.posts.iter_mut() {
            if post.treatment_id == Some(id) {
                post.treatment_id = None;
            }
        }
        for appointment in store.appointments.iter_mut() {
            if appointment.treatment_id == Some(id) {
                appointment.treatment_id = None;
            }
        }
        for video in store.videos.iter_mut() {
            video.treatment_ids.retain(|t| *t != id);
        }
        Ok(true)
    }

    async fn reorder_treatments(&self, ids: &[Uuid]) -> RepoResult<()> {
        let mut store = self.store.write().await;
        for (position, id) in ids.iter().enumerate() {
            if let Some(row) = store.treatments.iter_mut().find(|t| t.id == *id) {
                row.display_order = position as i32;
                row.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    // --- BLOG POSTS ---

    async fn list_blog_posts(&self, filter: BlogFilter) -> RepoResult<Vec<BlogPost>> {
        let store = self.store.read().await;
        let mut rows: Vec<BlogPost> = store
            .posts
            .iter()
            .filter(|p| filter.status.is_none_or(|s| p.status == s.as_str()))
            .filter(|p| {
                filter.category.as_deref().is_none_or(|c| {
                    p.category
                        .as_deref()
                        .is_some_and(|pc| pc.eq_ignore_ascii_case(c))
                })
            })
            .filter(|p| filter.department_id.is_none() || p.department_id == filter.department_id)
            .filter(|p| filter.treatment_id.is_none() || p.treatment_id == filter.treatment_id)
            .cloned()
            .collect();
        // Newest publication first, unpublished drafts last.
        rows.sort_by(|a, b| match (a.published_at, b.published_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => b.created_at.cmp(&a.created_at),
        });
        if let Some(limit) = filter.limit {
            rows.truncate(limit.max(0) as usize);
        }
        Ok(rows)
    }

    async fn get_blog_post(&self, id: Uuid) -> RepoResult<Option<BlogPost>> {
        let store = self.store.read().await;
        Ok(store.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn get_blog_post_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> RepoResult<Option<BlogPost>> {
        let store = self.store.read().await;
        Ok(store
            .posts
            .iter()
            .find(|p| p.slug == slug && (!published_only || p.is_published()))
            .cloned())
    }

    async fn create_blog_post(
        &self,
        slug: String,
        author_id: Uuid,
        req: CreateBlogPostRequest,
    ) -> RepoResult<BlogPost> {
        let mut store = self.store.write().await;
        if store.posts.iter().any(|p| p.slug == slug) {
            return Err(RepoError::Conflict("blog_posts_slug_key".to_string()));
        }
        if !store.department_exists(req.department_id) || !store.treatment_exists(req.treatment_id)
        {
            return Err(RepoError::InvalidReference("blog_posts_fkey".to_string()));
        }
        let now = Utc::now();
        let status = req.status.unwrap_or_default();
        let post = BlogPost {
            id: Uuid::new_v4(),
            title: req.title,
            slug,
            content: req.content,
            excerpt: req.excerpt,
            image_url: req.image_url,
            author_id: Some(author_id),
            category: req.category,
            department_id: req.department_id,
            treatment_id: req.treatment_id,
            published_at: (status == BlogStatus::Published).then_some(now),
            status: status.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        store.posts.push(post.clone());
        Ok(post)
    }

    async fn update_blog_post(
        &self,
        id: Uuid,
        req: UpdateBlogPostRequest,
    ) -> RepoResult<Option<BlogPost>> {
        let mut store = self.store.write().await;
        if let Some(slug) = &req.slug {
            if store.posts.iter().any(|p| &p.slug == slug && p.id != id) {
                return Err(RepoError::Conflict("blog_posts_slug_key".to_string()));
            }
        }
        if !store.department_exists(req.department_id) || !store.treatment_exists(req.treatment_id)
        {
            return Err(RepoError::InvalidReference("blog_posts_fkey".to_string()));
        }
        let Some(row) = store.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = req.title {
            row.title = title;
        }
        if let Some(slug) = req.slug {
            row.slug = slug;
        }
        if let Some(content) = req.content {
            row.content = content;
        }
        if req.excerpt.is_some() {
            row.excerpt = req.excerpt;
        }
        if req.image_url.is_some() {
            row.image_url = req.image_url;
        }
        if req.category.is_some() {
            row.category = req.category;
        }
        if req.department_id.is_some() {
            row.department_id = req.department_id;
        }
        if req.treatment_id.is_some() {
            row.treatment_id = req.treatment_id;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn set_blog_status(
        &self,
        id: Uuid,
        status: BlogStatus,
    ) -> RepoResult<Option<BlogPost>> {
        let mut store = self.store.write().await;
        Ok(store.posts.iter_mut().find(|p| p.id == id).map(|row| {
            let now = Utc::now();
            row.status = status.as_str().to_string();
            if status == BlogStatus::Published && row.published_at.is_none() {
                row.published_at = Some(now);
            }
            row.updated_at = now;
            row.clone()
        }))
    }

    async fn delete_blog_post(&self, id: Uuid) -> RepoResult<bool> {
        let mut store = self.store.write().await;
        let before = store.posts.len();
        store.posts.retain(|p| p.id != id);
        Ok(store.posts.len() != before)
    }

    // --- VIDEOS ---

    async fn list_videos(&self, filter: VideoFilter) -> RepoResult<Vec<Video>> {
        let store = self.store.read().await;
        let mut rows: Vec<Video> = store
            .videos
            .iter()
            .filter(|v| filter.include_inactive || v.is_active)
            .filter(|v| !filter.global_only || v.show_global)
            .filter(|v| match (filter.department_id, filter.treatment_id) {
                (None, None) => true,
                (dept, treat) => {
                    dept.is_some_and(|d| v.department_ids.contains(&d))
                        || treat.is_some_and(|t| v.treatment_ids.contains(&t))
                }
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    async fn get_video(&self, id: Uuid) -> RepoResult<Option<Video>> {
        let store = self.store.read().await;
        Ok(store.videos.iter().find(|v| v.id == id).cloned())
    }

    async fn create_video(&self, req: CreateVideoRequest) -> RepoResult<Video> {
        let mut store = self.store.write().await;
        let links_valid = req
            .department_ids
            .iter()
            .all(|d| store.department_exists(Some(*d)))
            && req
                .treatment_ids
                .iter()
                .all(|t| store.treatment_exists(Some(*t)));
        if !links_valid {
            return Err(RepoError::InvalidReference("video_links_fkey".to_string()));
        }
        let now = Utc::now();
        let mut department_ids = req.department_ids;
        department_ids.sort();
        department_ids.dedup();
        let mut treatment_ids = req.treatment_ids;
        treatment_ids.sort();
        treatment_ids.dedup();
        let video = Video {
            id: Uuid::new_v4(),
            title: req.title,
            youtube_url: req.youtube_url,
            thumbnail_url: req.thumbnail_url,
            is_active: req.is_active.unwrap_or(true),
            show_global: req.show_global.unwrap_or(false),
            display_order: req
                .display_order
                .unwrap_or_else(|| Store::next_order(&store.videos, |v| v.display_order)),
            department_ids,
            treatment_ids,
            created_at: now,
            updated_at: now,
        };
        store.videos.push(video.clone());
        Ok(video)
    }

    async fn update_video(&self, id: Uuid, req: UpdateVideoRequest) -> RepoResult<Option<Video>> {
        let mut store = self.store.write().await;
        let links_valid = req
            .department_ids
            .iter()
            .flatten()
            .all(|d| store.department_exists(Some(*d)))
            && req
                .treatment_ids
                .iter()
                .flatten()
                .all(|t| store.treatment_exists(Some(*t)));
        if !links_valid {
            return Err(RepoError::InvalidReference("video_links_fkey".to_string()));
        }
        let Some(row) = store.videos.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        if let Some(title) = req.title {
            row.title = title;
        }
        if let Some(url) = req.youtube_url {
            row.youtube_url = url;
        }
        if req.thumbnail_url.is_some() {
            row.thumbnail_url = req.thumbnail_url;
        }
        if let Some(show_global) = req.show_global {
            row.show_global = show_global;
        }
        if let Some(order) = req.display_order {
            row.display_order = order;
        }
        if let Some(mut ids) = req.department_ids {
            ids.sort();
            ids.dedup();
            row.department_ids = ids;
        }
        if let Some(mut ids) = req.treatment_ids {
            ids.sort();
            ids.dedup();
            row.treatment_ids = ids;
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn set_video_active(&self, id: Uuid, is_active: bool) -> RepoResult<Option<Video>> {
        let mut store = self.store.write().await;
        Ok(store.videos.iter_mut().find(|v| v.id == id).map(|row| {
            row.is_active = is_active;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete_video(&self, id: Uuid) -> RepoResult<bool> {
        let mut store = self.store.write().await;
        let before = store.videos.len();
        store.videos.retain(|v| v.id != id);
        Ok(store.videos.len() != before)
    }

    async fn reorder_videos(&self, ids: &[Uuid]) -> RepoResult<()> {
        let mut store = self.store.write().await;
        for (position, id) in ids.iter().enumerate() {
            if let Some(row) = store.videos.iter_mut().find(|v| v.id == *id) {
                row.display_order = position as i32;
                row.updated_at = Utc::now();
            }
        }
        Ok(())
    }

    // --- PROFILES ---

    async fn get_profile(&self, id: Uuid) -> RepoResult<Option<Profile>> {
        let store = self.store.read().await;
        Ok(store.profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn list_profiles(&self) -> RepoResult<Vec<Profile>> {
        let store = self.store.read().await;
        let mut rows = store.profiles.clone();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(rows)
    }

    async fn create_profile(&self, profile: Profile) -> RepoResult<Profile> {
        let mut store = self.store.write().await;
        if store
            .profiles
            .iter()
            .any(|p| p.id == profile.id || p.email == profile.email)
        {
            return Err(RepoError::Conflict("profiles_email_key".to_string()));
        }
        let now = Utc::now();
        let profile = Profile {
            created_at: now,
            updated_at: now,
            ..profile
        };
        store.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        id: Uuid,
        req: UpdateProfileRequest,
    ) -> RepoResult<Option<Profile>> {
        let mut store = self.store.write().await;
        Ok(store.profiles.iter_mut().find(|p| p.id == id).map(|row| {
            if req.full_name.is_some() {
                row.full_name = req.full_name;
            }
            if let Some(role) = req.role {
                row.role = role.as_str().to_string();
            }
            if let Some(is_active) = req.is_active {
                row.is_active = is_active;
            }
            if req.avatar_url.is_some() {
                row.avatar_url = req.avatar_url;
            }
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete_profile(&self, id: Uuid) -> RepoResult<bool> {
        let mut store = self.store.write().await;
        let before = store.profiles.len();
        store.profiles.retain(|p| p.id != id);
        if store.profiles.len() == before {
            return Ok(false);
        }
        for post in store.posts.iter_mut() {
            if post.author_id == Some(id) {
                post.author_id = None;
            }
        }
        Ok(true)
    }

    // --- APPOINTMENTS ---

    async fn create_appointment(&self, req: CreateAppointmentRequest) -> RepoResult<Appointment> {
        let mut store = self.store.write().await;
        if !store.department_exists(req.department_id) || !store.treatment_exists(req.treatment_id)
        {
            return Err(RepoError::InvalidReference("appointments_fkey".to_string()));
        }
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_name: req.patient_name,
            email: req.email,
            phone: req.phone,
            department_id: req.department_id,
            treatment_id: req.treatment_id,
            preferred_date: req.preferred_date,
            message: req.message,
            status: AppointmentStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        store.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
    ) -> RepoResult<Vec<Appointment>> {
        let store = self.store.read().await;
        let mut rows: Vec<Appointment> = store
            .appointments
            .iter()
            .filter(|a| status.is_none_or(|s| a.status == s.as_str()))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn set_appointment_status(
        &self,
        id: Uuid,
        status: AppointmentStatus,
    ) -> RepoResult<Option<Appointment>> {
        let mut store = self.store.write().await;
        Ok(store.appointments.iter_mut().find(|a| a.id == id).map(|row| {
            row.status = status.as_str().to_string();
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete_appointment(&self, id: Uuid) -> RepoResult<bool> {
        let mut store = self.store.write().await;
        let before = store.appointments.len();
        store.appointments.retain(|a| a.id != id);
        Ok(store.appointments.len() != before)
    }

    // --- DASHBOARD ---

    async fn get_dashboard_stats(&self) -> RepoResult<DashboardStats> {
        let store = self.store.read().await;
        let count = |n: usize| n as i64;
        Ok(DashboardStats {
            total_departments: count(store.departments.len()),
            active_departments: count(store.departments.iter().filter(|d| d.is_active).count()),
            total_treatments: count(store.treatments.len()),
            published_posts: count(store.posts.iter().filter(|p| p.is_published()).count()),
            draft_posts: count(store.posts.iter().filter(|p| !p.is_published()).count()),
            total_videos: count(store.videos.len()),
            pending_appointments: count(
                store
                    .appointments
                    .iter()
                    .filter(|a| a.status == AppointmentStatus::Pending.as_str())
                    .count(),
            ),
        })
    }
}
