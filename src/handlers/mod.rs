//! HTTP handlers, one module per resource.
//!
//! Public handlers only ever see active / published content. Everything under
//! `/admin` runs behind the route gate, so admin handlers receive an already
//! authorized `AuthUser`.

use serde::Deserialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    repository::RepositoryState,
};

pub mod appointments;
pub mod blogs;
pub mod dashboard;
pub mod departments;
pub mod maintenance;
pub mod public;
pub mod treatments;
pub mod users;
pub mod videos;

/// Upper bound for the public `limit` query parameter.
pub const MAX_PAGE_SIZE: i64 = 100;

/// DepartmentScope
///
/// `?department_id=` filter shared by the treatment listings.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct DepartmentScope {
    pub department_id: Option<Uuid>,
}

/// ContentScope
///
/// `?department_id=&treatment_id=` filter used by the video listings.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct ContentScope {
    pub department_id: Option<Uuid>,
    pub treatment_id: Option<Uuid>,
}

/// Rejects writes that point at a department or treatment that does not exist.
pub(crate) async fn ensure_references(
    repo: &RepositoryState,
    department_id: Option<Uuid>,
    treatment_id: Option<Uuid>,
) -> AppResult<()> {
    if let Some(id) = department_id {
        if repo.get_department(id).await?.is_none() {
            return Err(AppError::Validation(format!("department {id} does not exist")));
        }
    }
    if let Some(id) = treatment_id {
        if repo.get_treatment(id).await?.is_none() {
            return Err(AppError::Validation(format!("treatment {id} does not exist")));
        }
    }
    Ok(())
}
