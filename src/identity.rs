use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::AppError;

/// IdentityProvider
///
/// Creates and removes login accounts in the external auth service. Profiles in our
/// database mirror these accounts by id.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates a confirmed account and returns its auth user id.
    async fn create_user(&self, email: &str, password: &str) -> Result<Uuid, AppError>;

    async fn delete_user(&self, id: Uuid) -> Result<(), AppError>;
}

pub type IdentityState = Arc<dyn IdentityProvider>;

/// Minimal view of the Supabase admin API user object.
#[derive(Deserialize)]
struct SupabaseUser {
    id: Uuid,
}

/// SupabaseIdentity
///
/// Talks to the Supabase auth admin API (`/auth/v1/admin/users`) with the service-role key.
pub struct SupabaseIdentity {
    client: reqwest::Client,
    base_url: Option<String>,
    service_key: Option<String>,
}

impl SupabaseIdentity {
    pub fn new(base_url: Option<String>, service_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            service_key,
        }
    }

    fn credentials(&self) -> Result<(&str, &str), AppError> {
        match (self.base_url.as_deref(), self.service_key.as_deref()) {
            (Some(url), Some(key)) => Ok((url.trim_end_matches('/'), key)),
            _ => Err(AppError::Internal(
                "SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY are required to manage users"
                    .to_string(),
            )),
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn create_user(&self, email: &str, password: &str) -> Result<Uuid, AppError> {
        let (base_url, key) = self.credentials()?;

        let response = self
            .client
            .post(format!("{base_url}/auth/v1/admin/users"))
            .header("apikey", key)
            .bearer_auth(key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "email_confirm": true,
            }))
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("auth provider unreachable: {e}")))?;

        let status = response.status();
        if status.as_u16() == 422 || status.as_u16() == 409 {
            return Err(AppError::Conflict(format!("an account for {email} already exists")));
        }
        if !status.is_success() {
            return Err(AppError::Internal(format!("auth provider returned {status}")));
        }

        let user = response
            .json::<SupabaseUser>()
            .await
            .map_err(|e| AppError::Internal(format!("unexpected auth provider response: {e}")))?;
        Ok(user.id)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), AppError> {
        let (base_url, key) = self.credentials()?;

        let response = self
            .client
            .delete(format!("{base_url}/auth/v1/admin/users/{id}"))
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("auth provider unreachable: {e}")))?;

        // Already gone upstream is fine: the profile is what we are removing.
        if response.status().is_success() || response.status().as_u16() == 404 {
            Ok(())
        } else {
            Err(AppError::Internal(format!(
                "auth provider returned {}",
                response.status()
            )))
        }
    }
}

/// MockIdentity
///
/// Hands out fresh ids without any network call; `should_fail` simulates an outage.
#[derive(Default, Clone)]
pub struct MockIdentity {
    pub should_fail: bool,
}

impl MockIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentity {
    async fn create_user(&self, _email: &str, _password: &str) -> Result<Uuid, AppError> {
        if self.should_fail {
            return Err(AppError::Internal("Mock identity: simulated failure".to_string()));
        }
        Ok(Uuid::new_v4())
    }

    async fn delete_user(&self, _id: Uuid) -> Result<(), AppError> {
        if self.should_fail {
            return Err(AppError::Internal("Mock identity: simulated failure".to_string()));
        }
        Ok(())
    }
}
