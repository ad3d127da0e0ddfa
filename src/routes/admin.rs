use crate::{
    AppState,
    handlers::{
        appointments, blogs, dashboard, departments, maintenance, treatments, users, videos,
    },
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Admin Router Module
///
/// The backoffice API, mounted under `/admin`. The whole router is wrapped by
/// `rbac::route_gate`, which decides per path prefix which roles get through:
/// content editing for all staff, structure and appointments for admins, users and
/// maintenance for super admins only.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::get_dashboard))
        // --- Departments ---
        .route(
            "/departments",
            get(departments::admin_list_departments).post(departments::create_department),
        )
        // Static segments take priority over `{id}`.
        .route("/departments/order", put(departments::reorder_departments))
        .route(
            "/departments/{id}",
            get(departments::admin_get_department)
                .put(departments::update_department)
                .delete(departments::delete_department),
        )
        .route(
            "/departments/{id}/status",
            put(departments::set_department_status),
        )
        // --- Treatments ---
        .route(
            "/treatments",
            get(treatments::admin_list_treatments).post(treatments::create_treatment),
        )
        .route("/treatments/order", put(treatments::reorder_treatments))
        .route(
            "/treatments/{id}",
            get(treatments::admin_get_treatment)
                .put(treatments::update_treatment)
                .delete(treatments::delete_treatment),
        )
        .route(
            "/treatments/{id}/status",
            put(treatments::set_treatment_status),
        )
        // --- Blog posts ---
        .route(
            "/blogs",
            get(blogs::admin_list_blogs).post(blogs::create_blog),
        )
        .route(
            "/blogs/{id}",
            get(blogs::admin_get_blog)
                .put(blogs::update_blog)
                .delete(blogs::delete_blog),
        )
        .route("/blogs/{id}/status", put(blogs::set_blog_status))
        // --- Videos ---
        .route(
            "/videos",
            get(videos::admin_list_videos).post(videos::create_video),
        )
        .route("/videos/order", put(videos::reorder_videos))
        .route(
            "/videos/{id}",
            get(videos::admin_get_video)
                .put(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/videos/{id}/status", put(videos::set_video_status))
        // --- Appointments ---
        .route("/appointments", get(appointments::list_appointments))
        .route(
            "/appointments/{id}",
            delete(appointments::delete_appointment),
        )
        .route(
            "/appointments/{id}/status",
            put(appointments::set_appointment_status),
        )
        // --- Staff ---
        .route("/users", get(users::list_users).post(users::invite_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // --- Maintenance ---
        .route(
            "/maintenance/treatment-departments",
            post(maintenance::backfill_treatment_departments),
        )
}
