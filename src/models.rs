use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Roles & Status Enums ---

/// Role
///
/// Staff roles stored in `profiles.role`. The route gate maps URL prefixes to the
/// subset of roles allowed to reach them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Role {
    Editor,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Editor => "editor",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BlogStatus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BlogStatus {
    #[default]
    Draft,
    Published,
}

impl BlogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
        }
    }
}

/// AppointmentStatus
///
/// Lifecycle of an appointment request. New requests start as `pending`; staff move
/// them along from the backoffice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

// --- Core Schemas (Mapped to Database) ---

/// Profile
///
/// A staff member's row in `public.profiles`. The id is the Supabase auth user id.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    // 'editor' | 'admin' | 'super_admin'. Parsed into `Role` at the auth boundary.
    pub role: String,
    // Disabled accounts are rejected by the route gate.
    pub is_active: bool,
    pub avatar_url: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Department
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    // Inactive departments are hidden from every public read.
    pub is_active: bool,
    pub display_order: i32,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Treatment
///
/// A service offered by a department. `category` is the legacy free-text grouping that
/// the department backfill matches against.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Treatment {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub department_id: Option<Uuid>,
    pub youtube_url: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// BlogPost
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub author_id: Option<Uuid>,
    pub category: Option<String>,
    pub department_id: Option<Uuid>,
    pub treatment_id: Option<Uuid>,
    // Stamped the first time the post is published.
    #[ts(type = "string | null")]
    pub published_at: Option<DateTime<Utc>>,
    // 'draft' | 'published'
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn is_published(&self) -> bool {
        self.status == BlogStatus::Published.as_str()
    }
}

/// Video
///
/// A YouTube video, linked many-to-many to departments and treatments. Videos with
/// `show_global` appear on pages that are not scoped to a department or treatment.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub youtube_url: String,
    pub thumbnail_url: Option<String>,
    pub is_active: bool,
    pub show_global: bool,
    pub display_order: i32,
    // Aggregated from `video_departments` by the repository query.
    pub department_ids: Vec<Uuid>,
    // Aggregated from `video_treatments`.
    pub treatment_ids: Vec<Uuid>,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// Appointment
///
/// An appointment request submitted from the public booking form.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default)]
#[ts(export)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_name: String,
    pub email: String,
    pub phone: String,
    pub department_id: Option<Uuid>,
    pub treatment_id: Option<Uuid>,
    #[ts(type = "string | null")]
    pub preferred_date: Option<NaiveDate>,
    pub message: Option<String>,
    // 'pending' | 'confirmed' | 'cancelled' | 'completed'
    pub status: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// CreateDepartmentRequest
///
/// The slug is derived from the name when omitted.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateDepartmentRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

/// UpdateDepartmentRequest
///
/// Partial update; only provided fields are written.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateDepartmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

/// CreateTreatmentRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateTreatmentRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub department_id: Option<Uuid>,
    #[validate(url(message = "youtube_url must be a URL"))]
    pub youtube_url: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// UpdateTreatmentRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateTreatmentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "youtube_url must be a URL"))]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
}

/// CreateBlogPostRequest
///
/// The author is always the calling staff member, never taken from the payload.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateBlogPostRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub slug: Option<String>,
    #[serde(default)]
    pub content: String,
    pub excerpt: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub department_id: Option<Uuid>,
    pub treatment_id: Option<Uuid>,
    pub status: Option<BlogStatus>,
}

/// UpdateBlogPostRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateBlogPostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_id: Option<Uuid>,
}

/// CreateVideoRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateVideoRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(url(message = "youtube_url must be a URL"))]
    pub youtube_url: String,
    pub thumbnail_url: Option<String>,
    pub is_active: Option<bool>,
    pub show_global: Option<bool>,
    pub display_order: Option<i32>,
    #[serde(default)]
    pub department_ids: Vec<Uuid>,
    #[serde(default)]
    pub treatment_ids: Vec<Uuid>,
}

/// UpdateVideoRequest
///
/// Link lists, when present, replace the existing links entirely.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct UpdateVideoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "youtube_url must be a URL"))]
    pub youtube_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_global: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_ids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_ids: Option<Vec<Uuid>>,
}

/// CreateAppointmentRequest
///
/// Public booking form payload (POST /appointments).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate, Default)]
#[ts(export)]
pub struct CreateAppointmentRequest {
    #[validate(length(min = 1, max = 200, message = "patient_name must not be empty"))]
    pub patient_name: String,
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 5, max = 32, message = "phone is not a valid number"))]
    pub phone: String,
    pub department_id: Option<Uuid>,
    pub treatment_id: Option<Uuid>,
    #[ts(type = "string | null")]
    pub preferred_date: Option<NaiveDate>,
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

/// InviteUserRequest
///
/// Creates the Supabase auth user and mirrors it into `profiles`. The password is only
/// forwarded to the identity provider, never stored or logged here.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Validate)]
#[ts(export)]
pub struct InviteUserRequest {
    #[validate(email(message = "email is not a valid address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub full_name: Option<String>,
    pub role: Role,
}

/// UpdateProfileRequest
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// ReorderRequest
///
/// Ids in their new display order; `display_order` becomes each id's index.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct ReorderRequest {
    pub ids: Vec<Uuid>,
}

// --- Composite Read Models (Output) ---

/// DepartmentDetail
///
/// Everything the public department page shows.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct DepartmentDetail {
    pub department: Department,
    pub treatments: Vec<Treatment>,
    pub videos: Vec<Video>,
    pub posts: Vec<BlogPost>,
}

/// TreatmentDetail
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct TreatmentDetail {
    pub treatment: Treatment,
    pub department: Option<Department>,
    pub videos: Vec<Video>,
    pub posts: Vec<BlogPost>,
}

/// DashboardStats
///
/// Counters for the backoffice landing page (GET /admin/dashboard).
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, FromRow, Default, PartialEq)]
#[ts(export)]
pub struct DashboardStats {
    pub total_departments: i64,
    pub active_departments: i64,
    pub total_treatments: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub total_videos: i64,
    pub pending_appointments: i64,
}
