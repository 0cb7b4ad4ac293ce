//! Teacher sign-in, registration and sign-out.

use eduassist_core::Result;
use eduassist_core::routes::{AuthState, RouteDecision};
use eduassist_core::session_store::{SessionStore, SessionStoreExt, StorageKey};
use eduassist_interaction::ApiClient;
use eduassist_interaction::endpoints::{LoginRequest, RegisterRequest};
use serde_json::{Value, json};
use std::sync::Arc;

pub struct AuthService {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    auth_state: Arc<AuthState>,
}

impl AuthService {
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>, auth_state: Arc<AuthState>) -> Self {
        Self {
            client,
            store,
            auth_state,
        }
    }

    /// Signs the teacher in and persists the token.
    ///
    /// A rejected password comes back as [`eduassist_core::EduError::Unauthorized`]
    /// carrying the server's message; the existing session is left alone.
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<Value>> {
        let response = self
            .client
            .educator_login(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;

        self.store
            .set(StorageKey::Token, json!(response.access_token))?;
        self.auth_state.set_authenticated(true);
        tracing::info!("[Auth] Signed in as {}", email.trim());
        Ok(response.educator)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Value> {
        let created = self.client.educator_register(request).await?;
        tracing::info!("[Auth] Registered {}", request.email);
        Ok(created)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear(StorageKey::Token)?;
        self.auth_state.set_authenticated(false);
        tracing::info!("[Auth] Signed out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        self.auth_state.is_authenticated(self.store.as_ref())
    }

    pub fn token(&self) -> Result<Option<String>> {
        self.store.get_string(StorageKey::Token)
    }

    pub fn resolve_route(&self, path: &str) -> Result<RouteDecision> {
        self.auth_state.resolve(path, self.store.as_ref())
    }

    pub async fn me(&self) -> Result<Value> {
        Ok(self.client.educator_me().await?)
    }

    pub async fn profile(&self) -> Result<Value> {
        Ok(self.client.educator_profile().await?)
    }

    pub async fn update_profile(&self, profile: &Value) -> Result<Value> {
        Ok(self.client.update_educator_profile(profile).await?)
    }
}
