use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::AppError,
    models::{Profile, Role},
    repository::RepositoryState,
};

/// Audience Supabase puts on tokens issued to signed-in users.
pub const SUPABASE_AUDIENCE: &str = "authenticated";

/// Claims
///
/// The subset of a Supabase access token this service relies on.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the auth user id, which is also the `profiles.id`.
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
    pub aud: String,
}

/// AuthUser
///
/// The resolved identity of a staff member making a request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Builds the identity from an active profile. Returns `None` when the stored role
    /// is not one this service knows.
    pub fn from_profile(profile: &Profile) -> Option<Self> {
        let role = profile.role.parse::<Role>().ok()?;
        Some(Self {
            id: profile.id,
            email: profile.email.clone(),
            role,
        })
    }
}

/// The `x-user-id` header, honoured only in `Env::Local`.
pub fn bypass_user_id(headers: &HeaderMap, config: &AppConfig) -> Option<Uuid> {
    if config.env != Env::Local {
        return None;
    }
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|id| Uuid::parse_str(id).ok())
}

/// Subject of the `Authorization: Bearer` token, which must be a valid, unexpired
/// Supabase JWT.
pub fn bearer_user_id(headers: &HeaderMap, config: &AppConfig) -> Option<Uuid> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))?;

    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.set_audience(&[SUPABASE_AUDIENCE]);

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Some(data.claims.sub),
        Err(e) => {
            match e.kind() {
                ErrorKind::ExpiredSignature => tracing::debug!("rejected expired token"),
                other => tracing::debug!(error = ?other, "rejected invalid token"),
            }
            None
        }
    }
}

/// Resolves the request's session to its profile row.
///
/// A local `x-user-id` only wins when that profile exists; otherwise the Bearer token
/// is tried. `Ok(None)` means there is no usable session (no credentials, bad token, or
/// no profile for the subject). Database failures are returned as errors.
pub async fn resolve_profile(
    headers: &HeaderMap,
    repo: &RepositoryState,
    config: &AppConfig,
) -> Result<Option<Profile>, AppError> {
    if let Some(bypass_id) = bypass_user_id(headers, config) {
        if let Some(profile) = repo.get_profile(bypass_id).await? {
            return Ok(Some(profile));
        }
        tracing::debug!(user_id = %bypass_id, "x-user-id has no profile, trying bearer token");
    }

    let Some(user_id) = bearer_user_id(headers, config) else {
        return Ok(None);
    };
    Ok(repo.get_profile(user_id).await?)
}

/// AuthUser Extractor
///
/// Reuses the identity the route gate stored in the request extensions; otherwise
/// resolves it from the credentials. Missing or invalid credentials are 401, a disabled
/// account or unknown role is 403.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        let profile = resolve_profile(&parts.headers, &repo, &config)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !profile.is_active {
            return Err(AppError::Forbidden("account disabled".to_string()));
        }

        AuthUser::from_profile(&profile)
            .ok_or_else(|| AppError::Forbidden(format!("unknown role '{}'", profile.role)))
    }
}
