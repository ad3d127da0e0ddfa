use crate::{AppState, handlers::public};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Endpoints that need a signed-in staff member but no particular role. The router is
/// wrapped in `auth_middleware`, so handlers can rely on `AuthUser` resolving.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /me
        // The caller's own profile, used by the backoffice shell.
        .route("/me", get(public::get_me))
}
