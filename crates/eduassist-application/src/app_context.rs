//! Wires stores, clients and services together for a front end.

use crate::assistant_usecase::AssistantUseCase;
use crate::auth_service::AuthService;
use crate::chat_service::{EnhancedAssistantService, SimpleChatService};
use crate::dashboard_service::DashboardService;
use crate::student_portal::StudentPortal;
use anyhow::{Context, Result};
use chrono::Utc;
use eduassist_core::config::ClientConfig;
use eduassist_core::notify::Notifier;
use eduassist_core::routes::{AuthState, Navigator};
use eduassist_core::session_store::{InMemorySessionStore, SessionStore};
use eduassist_infrastructure::{ConfigService, EduPaths, FileSessionStore};
use eduassist_interaction::{
    ApiClient, AuthGuard, AuthScope, HttpAssistantBackend, PerformanceFeed,
};
use std::sync::Arc;

pub struct AppContext {
    config: ClientConfig,
    store: Arc<dyn SessionStore>,
    auth_state: Arc<AuthState>,
    teacher_client: ApiClient,
    student_client: ApiClient,
}

impl AppContext {
    /// Loads configuration and opens the on-disk session store under `paths`.
    pub fn bootstrap(
        paths: &EduPaths,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let config = ConfigService::new(paths)
            .get_config()
            .context("Failed to load client configuration")?;

        let store: Arc<dyn SessionStore> = match paths.session_file() {
            Ok(path) => {
                tracing::debug!("[AppContext] Session file: {}", path.display());
                Arc::new(FileSessionStore::new(path))
            }
            Err(e) => {
                tracing::warn!("[AppContext] {}; session will not persist", e);
                Arc::new(InMemorySessionStore::new())
            }
        };

        Ok(Self::new(config, store, navigator, notifier))
    }

    pub fn new(
        config: ClientConfig,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let auth_state = Arc::new(AuthState::new());
        let client_for = |scope| {
            let guard = AuthGuard::new(
                scope,
                store.clone(),
                navigator.clone(),
                notifier.clone(),
                auth_state.clone(),
            );
            ApiClient::new(config.clone(), Arc::new(guard))
        };
        let teacher_client = client_for(AuthScope::Teacher);
        let student_client = client_for(AuthScope::Student);

        Self {
            config,
            store,
            auth_state,
            teacher_client,
            student_client,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.teacher_client.clone(),
            self.store.clone(),
            self.auth_state.clone(),
        )
    }

    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(self.teacher_client.clone(), self.store.clone())
    }

    /// The scripted assistant, restored from the last saved state.
    pub fn assistant(&self) -> Result<AssistantUseCase> {
        let backend = Arc::new(HttpAssistantBackend::new(self.teacher_client.clone()));
        AssistantUseCase::restore(backend, self.store.clone(), Utc::now())
            .context("Failed to restore assistant state")
    }

    pub fn enhanced_assistant(&self) -> EnhancedAssistantService {
        EnhancedAssistantService::new(self.teacher_client.clone(), self.store.clone(), Utc::now())
    }

    pub fn simple_chat(&self) -> SimpleChatService {
        SimpleChatService::new(self.teacher_client.clone(), self.store.clone())
    }

    pub fn student_portal(&self) -> StudentPortal {
        StudentPortal::new(self.student_client.clone(), self.store.clone())
    }

    pub fn performance_feed(&self, educator_id: &str) -> PerformanceFeed {
        PerformanceFeed::new(&self.config, educator_id)
    }
}
