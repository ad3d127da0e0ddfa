use axum::{
    extract::{OriginalUri, Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    auth::{AuthUser, resolve_profile},
    error::AppError,
    models::{Profile, Role},
};

const ALL_STAFF: &[Role] = &[Role::Editor, Role::Admin, Role::SuperAdmin];
const ADMINS: &[Role] = &[Role::Admin, Role::SuperAdmin];
const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];

/// Path prefix → roles allowed under it. The longest matching prefix decides.
pub const ROUTE_PERMISSIONS: &[(&str, &[Role])] = &[
    ("/admin/users", SUPER_ADMIN),
    ("/admin/maintenance", SUPER_ADMIN),
    ("/admin/appointments", ADMINS),
    ("/admin/departments", ADMINS),
    ("/admin/treatments", ADMINS),
    ("/admin/blogs", ALL_STAFF),
    ("/admin/videos", ALL_STAFF),
    ("/admin", ALL_STAFF),
];

/// Outcome of checking a path against the permission table.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    Allow,
    Unauthenticated,
    Forbidden,
    Disabled,
}

/// `prefix` matches `path` only on a segment boundary.
fn prefix_matches(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Roles allowed to reach `path`, or `None` when no rule covers it.
pub fn required_roles(path: &str) -> Option<&'static [Role]> {
    ROUTE_PERMISSIONS
        .iter()
        .filter(|(prefix, _)| prefix_matches(path, prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, roles)| *roles)
}

/// Decides whether the session's profile may reach `path`.
pub fn authorize(path: &str, profile: Option<&Profile>) -> AccessDecision {
    let Some(allowed) = required_roles(path) else {
        return AccessDecision::Allow;
    };
    let Some(profile) = profile else {
        return AccessDecision::Unauthenticated;
    };
    if !profile.is_active {
        return AccessDecision::Disabled;
    }
    match profile.role.parse::<Role>() {
        Ok(role) if allowed.contains(&role) => AccessDecision::Allow,
        _ => AccessDecision::Forbidden,
    }
}

/// Login URL carrying the originally requested path, percent-encoded.
pub fn login_redirect(login_route: &str, path: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", path)
        .finish();
    format!("{login_route}?{query}")
}

fn wants_html(request: &Request) -> bool {
    request
        .headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// route_gate
///
/// Middleware applying `ROUTE_PERMISSIONS` to every request it wraps. Browsers are
/// redirected (login or dashboard); API clients get a JSON 401/403. On success the
/// resolved `AuthUser` is cached in the request extensions.
pub async fn route_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let profile = match resolve_profile(request.headers(), &state.repo, &state.config).await {
        Ok(profile) => profile,
        Err(e) => return e.into_response(),
    };

    let decision = authorize(&path, profile.as_ref());
    let html = wants_html(&request);
    let config = &state.config;

    match decision {
        AccessDecision::Allow => {
            if let Some(user) = profile.as_ref().and_then(AuthUser::from_profile) {
                request.extensions_mut().insert(user);
            }
            next.run(request).await
        }
        AccessDecision::Unauthenticated => {
            tracing::debug!(path = %path, "unauthenticated request to gated route");
            if html {
                Redirect::to(&login_redirect(&config.login_route, &path)).into_response()
            } else {
                AppError::Unauthorized.into_response()
            }
        }
        AccessDecision::Forbidden => {
            tracing::warn!(path = %path, "role not permitted for route");
            if html {
                Redirect::to(&config.dashboard_route).into_response()
            } else {
                AppError::Forbidden("insufficient role for this resource".to_string())
                    .into_response()
            }
        }
        AccessDecision::Disabled => {
            tracing::warn!(path = %path, "disabled account rejected");
            if html {
                Redirect::to(&format!("{}?error=account_disabled", config.login_route))
                    .into_response()
            } else {
                AppError::Forbidden("account disabled".to_string()).into_response()
            }
        }
    }
}
