use axum::{Json, extract::State};

use crate::{AppState, auth::AuthUser, error::AppResult, models::DashboardStats};

/// get_dashboard
///
/// [Admin Route] Content and appointment counters for the backoffice landing page.
#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses((status = 200, description = "Stats", body = DashboardStats))
)]
pub async fn get_dashboard(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DashboardStats>> {
    Ok(Json(state.repo.get_dashboard_stats().await?))
}
