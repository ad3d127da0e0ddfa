use crate::{
    AppState,
    handlers::{appointments, public},
};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Read-only endpoints for the marketing site plus the appointment form. Every read
/// here goes through repository filters that exclude disabled and unpublished content.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        .route("/departments", get(public::list_departments))
        // GET /departments/{slug}
        // Department page: the department plus its treatments, videos and posts.
        .route("/departments/{slug}", get(public::get_department_page))
        .route("/treatments", get(public::list_treatments))
        .route("/treatments/{slug}", get(public::get_treatment_page))
        .route("/blogs", get(public::list_blogs))
        .route("/blogs/{slug}", get(public::get_blog))
        // GET /videos?department_id=&treatment_id=
        // Unscoped requests only see videos flagged for global display.
        .route("/videos", get(public::list_videos))
        // POST /appointments
        // Stores the request, then emails the inbox and pings the messaging channel.
        .route("/appointments", post(appointments::create_appointment))
}
