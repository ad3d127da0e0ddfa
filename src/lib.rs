use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod backfill;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod notify;
pub mod rbac;
pub mod repository;
pub mod slug;

// Routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::AuthUser;
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use identity::{IdentityState, MockIdentity, SupabaseIdentity};
pub use notify::{MockNotifier, NotificationDispatcher, NotifierState};
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and schema into the OpenAPI document
/// served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::public::list_departments, handlers::public::get_department_page,
        handlers::public::list_treatments, handlers::public::get_treatment_page,
        handlers::public::list_blogs, handlers::public::get_blog,
        handlers::public::list_videos, handlers::public::get_me,
        handlers::appointments::create_appointment, handlers::appointments::list_appointments,
        handlers::appointments::set_appointment_status, handlers::appointments::delete_appointment,
        handlers::dashboard::get_dashboard,
        handlers::departments::admin_list_departments, handlers::departments::admin_get_department,
        handlers::departments::create_department, handlers::departments::update_department,
        handlers::departments::set_department_status, handlers::departments::delete_department,
        handlers::departments::reorder_departments,
        handlers::treatments::admin_list_treatments, handlers::treatments::admin_get_treatment,
        handlers::treatments::create_treatment, handlers::treatments::update_treatment,
        handlers::treatments::set_treatment_status, handlers::treatments::delete_treatment,
        handlers::treatments::reorder_treatments,
        handlers::blogs::admin_list_blogs, handlers::blogs::admin_get_blog,
        handlers::blogs::create_blog, handlers::blogs::update_blog,
        handlers::blogs::set_blog_status, handlers::blogs::delete_blog,
        handlers::videos::admin_list_videos, handlers::videos::admin_get_video,
        handlers::videos::create_video, handlers::videos::update_video,
        handlers::videos::set_video_status, handlers::videos::delete_video,
        handlers::videos::reorder_videos,
        handlers::users::list_users, handlers::users::get_user, handlers::users::invite_user,
        handlers::users::update_user, handlers::users::delete_user,
        handlers::maintenance::backfill_treatment_departments,
    ),
    components(
        schemas(
            models::Role, models::BlogStatus, models::AppointmentStatus,
            models::Profile, models::Department, models::Treatment, models::BlogPost,
            models::Video, models::Appointment,
            models::CreateDepartmentRequest, models::UpdateDepartmentRequest,
            models::CreateTreatmentRequest, models::UpdateTreatmentRequest,
            models::CreateBlogPostRequest, models::UpdateBlogPostRequest,
            models::CreateVideoRequest, models::UpdateVideoRequest,
            models::CreateAppointmentRequest, models::InviteUserRequest,
            models::UpdateProfileRequest, models::ReorderRequest,
            models::DepartmentDetail, models::TreatmentDetail, models::DashboardStats,
            backfill::BackfillReport, backfill::Assignment, backfill::Unmatched,
            backfill::MatchKind,
        )
    ),
    tags(
        (name = "hospital-cms", description = "Hospital site and backoffice API")
    )
)]
pub struct ApiDoc;

/// AppState
///
/// The single shared container of services handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Persistence (Postgres in production, in-memory in tests).
    pub repo: RepositoryState,
    /// Identity provider used to create and remove staff logins.
    pub identity: IdentityState,
    /// Appointment notification channels.
    pub notifier: NotifierState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for IdentityState {
    fn from_ref(app_state: &AppState) -> IdentityState {
        app_state.identity.clone()
    }
}

impl FromRef<AppState> for NotifierState {
    fn from_ref(app_state: &AppState) -> NotifierState {
        app_state.notifier.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Rejects the request before it reaches a handler unless `AuthUser` resolves
/// (401 without a session, 403 for a disabled account).
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles public, authenticated and admin routes, attaches their access layers and
/// wraps everything in the observability stack.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        // Every /admin route passes the role gate first.
        .nest(
            "/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                rbac::route_gate,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the per-request span so every log line carries method, URI and request id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
