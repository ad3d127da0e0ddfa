use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    AppState,
    auth::AuthUser,
    backfill::{BackfillReport, run_treatment_backfill},
    error::AppResult,
};

/// BackfillQuery
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct BackfillQuery {
    /// Write the planned assignments. Defaults to a dry run.
    #[serde(default)]
    pub apply: bool,
}

/// backfill_treatment_departments
///
/// [Super Admin Route] Assigns departments to treatments that only carry a legacy
/// category. Returns the plan; writes it only with `?apply=true`.
#[utoipa::path(
    post,
    path = "/admin/maintenance/treatment-departments",
    params(BackfillQuery),
    responses((status = 200, description = "Backfill plan", body = BackfillReport))
)]
pub async fn backfill_treatment_departments(
    user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<BackfillQuery>,
) -> AppResult<Json<BackfillReport>> {
    let report = run_treatment_backfill(state.repo.as_ref(), query.apply).await?;
    if report.applied {
        tracing::warn!(
            assigned = report.assignments.len(),
            by = %user.id,
            "Treatment department backfill applied"
        );
    }
    Ok(Json(report))
}
