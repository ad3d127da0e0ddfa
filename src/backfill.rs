//! Treatment → department backfill.
//!
//! Older treatments were filed under a free-text `category` instead of a department.
//! This module matches those categories to departments (exact first, then substring)
//! and optionally writes the result.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::RepoResult;
use crate::models::{Department, Treatment, UpdateTreatmentRequest};
use crate::repository::{Repository, TreatmentFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MatchKind {
    Exact,
    Fuzzy,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Assignment {
    pub treatment_id: Uuid,
    pub treatment_title: String,
    pub category: String,
    pub department_id: Uuid,
    pub department_name: String,
    pub match_kind: MatchKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Unmatched {
    pub treatment_id: Uuid,
    pub treatment_title: String,
    pub category: String,
}

/// BackfillReport
///
/// `applied` is false for a dry run.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[ts(export)]
pub struct BackfillReport {
    pub applied: bool,
    pub assignments: Vec<Assignment>,
    pub unmatched: Vec<Unmatched>,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Finds the department a free-text category refers to.
///
/// Exact: trimmed, case-insensitive equality with the name or slug. Fuzzy: either string
/// contains the other. Among fuzzy candidates the longest name wins, then the lower
/// `display_order`.
pub fn match_department<'a>(
    category: &str,
    departments: &'a [Department],
) -> Option<(&'a Department, MatchKind)> {
    let wanted = normalize(category);
    if wanted.is_empty() {
        return None;
    }

    if let Some(dept) = departments
        .iter()
        .find(|d| normalize(&d.name) == wanted || normalize(&d.slug) == wanted)
    {
        return Some((dept, MatchKind::Exact));
    }

    departments
        .iter()
        .filter(|d| {
            let name = normalize(&d.name);
            !name.is_empty() && (name.contains(&wanted) || wanted.contains(&name))
        })
        .min_by(|a, b| {
            b.name
                .trim()
                .len()
                .cmp(&a.name.trim().len())
                .then_with(|| a.display_order.cmp(&b.display_order))
        })
        .map(|dept| (dept, MatchKind::Fuzzy))
}

/// Plans department assignments for treatments that have a category but no department.
pub fn plan_treatment_backfill(
    treatments: &[Treatment],
    departments: &[Department],
) -> BackfillReport {
    let mut report = BackfillReport::default();

    for treatment in treatments.iter().filter(|t| t.department_id.is_none()) {
        let Some(category) = treatment
            .category
            .as_deref()
            .filter(|c| !c.trim().is_empty())
        else {
            continue;
        };

        match match_department(category, departments) {
            Some((dept, match_kind)) => report.assignments.push(Assignment {
                treatment_id: treatment.id,
                treatment_title: treatment.title.clone(),
                category: category.to_string(),
                department_id: dept.id,
                department_name: dept.name.clone(),
                match_kind,
            }),
            None => report.unmatched.push(Unmatched {
                treatment_id: treatment.id,
                treatment_title: treatment.title.clone(),
                category: category.to_string(),
            }),
        }
    }

    report
}

/// Loads every treatment and department, plans the backfill and, when `apply` is set,
/// writes each assignment.
pub async fn run_treatment_backfill(
    repo: &dyn Repository,
    apply: bool,
) -> RepoResult<BackfillReport> {
    let treatments = repo
        .list_treatments(TreatmentFilter {
            include_inactive: true,
            ..TreatmentFilter::default()
        })
        .await?;
    let departments = repo.list_departments(true).await?;

    let mut report = plan_treatment_backfill(&treatments, &departments);
    tracing::info!(
        matched = report.assignments.len(),
        unmatched = report.unmatched.len(),
        apply,
        "Planned treatment department backfill"
    );

    if apply {
        for assignment in &report.assignments {
            let update = UpdateTreatmentRequest {
                department_id: Some(assignment.department_id),
                ..UpdateTreatmentRequest::default()
            };
            repo.update_treatment(assignment.treatment_id, update).await?;
        }
        report.applied = true;
    }

    Ok(report)
}
