//! Global response policy: bearer tokens in, 401 handling and error
//! notifications out.

use crate::error::ApiError;
use eduassist_core::Result;
use eduassist_core::notify::Notifier;
use eduassist_core::routes::{AuthState, LOGIN_PATH, Navigator};
use eduassist_core::session_store::{SessionStore, SessionStoreExt, StorageKey};
use std::sync::Arc;

/// Which credential a client instance carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScope {
    Teacher,
    Student,
}

impl AuthScope {
    pub fn token_key(self) -> StorageKey {
        match self {
            Self::Teacher => StorageKey::Token,
            Self::Student => StorageKey::StudentToken,
        }
    }
}

/// Whether a request is a login attempt. A 401 on a login attempt is a
/// wrong password, not an expired session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Authenticated,
    Login,
}

pub struct AuthGuard {
    scope: AuthScope,
    store: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    auth_state: Arc<AuthState>,
}

impl AuthGuard {
    pub fn new(
        scope: AuthScope,
        store: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        auth_state: Arc<AuthState>,
    ) -> Self {
        Self {
            scope,
            store,
            navigator,
            notifier,
            auth_state,
        }
    }

    pub fn scope(&self) -> AuthScope {
        self.scope
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn auth_state(&self) -> &Arc<AuthState> {
        &self.auth_state
    }

    pub fn bearer_token(&self) -> Result<Option<String>> {
        self.store.get_string(self.scope.token_key())
    }

    /// Drops the stored credentials for this scope.
    pub fn clear_credentials(&self) -> Result<()> {
        self.store.clear(self.scope.token_key())?;
        if self.scope == AuthScope::Student {
            self.store.clear(StorageKey::StudentData)?;
        } else {
            self.auth_state.set_authenticated(false);
        }
        Ok(())
    }

    /// Applies side effects for a failed request.
    ///
    /// - 401 outside login: clear the token and redirect to `/login` once.
    /// - 401 during login: nothing; the caller shows the message inline.
    /// - everything else: surface the message through the notifier.
    pub fn on_failure(&self, kind: RequestKind, error: &ApiError) {
        match (error, kind) {
            (ApiError::Unauthorized { .. }, RequestKind::Login) => {
                tracing::debug!("[AuthGuard] Login rejected");
            }
            (ApiError::Unauthorized { .. }, RequestKind::Authenticated) => {
                tracing::warn!("[AuthGuard] Session expired, redirecting to {}", LOGIN_PATH);
                if let Err(e) = self.clear_credentials() {
                    tracing::error!("[AuthGuard] Failed to clear credentials: {}", e);
                }
                self.navigator.redirect(LOGIN_PATH);
            }
            (other, _) => self.notifier.error(&other.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduassist_core::notify::{NoticeLevel, RecordingNotifier};
    use eduassist_core::session_store::InMemorySessionStore;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator {
        paths: Mutex<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn redirect(&self, path: &str) {
            self.paths.lock().unwrap().push(path.to_string());
        }
    }

    fn guard(scope: AuthScope) -> (AuthGuard, Arc<InMemorySessionStore>, Arc<RecordingNavigator>, Arc<RecordingNotifier>) {
        let store = Arc::new(InMemorySessionStore::new());
        let navigator = Arc::new(RecordingNavigator::default());
        let notifier = Arc::new(RecordingNotifier::new());
        let guard = AuthGuard::new(
            scope,
            store.clone(),
            navigator.clone(),
            notifier.clone(),
            Arc::new(AuthState::new()),
        );
        (guard, store, navigator, notifier)
    }

    fn unauthorized() -> ApiError {
        ApiError::Unauthorized {
            message: "Could not validate credentials".into(),
        }
    }

    #[test]
    fn test_401_on_authenticated_call_clears_and_redirects_once() {
        let (guard, store, navigator, notifier) = guard(AuthScope::Teacher);
        store.set(StorageKey::Token, json!("expired")).unwrap();
        guard.auth_state().set_authenticated(true);

        guard.on_failure(RequestKind::Authenticated, &unauthorized());

        assert_eq!(store.get(StorageKey::Token).unwrap(), None);
        assert!(!guard.auth_state().is_flagged());
        assert_eq!(*navigator.paths.lock().unwrap(), vec!["/login".to_string()]);
        assert!(notifier.notices().is_empty());
    }

    #[test]
    fn test_401_on_login_keeps_token_and_does_not_redirect() {
        let (guard, store, navigator, _) = guard(AuthScope::Teacher);
        store.set(StorageKey::Token, json!("still-valid")).unwrap();

        guard.on_failure(RequestKind::Login, &unauthorized());

        assert_eq!(store.get(StorageKey::Token).unwrap(), Some(json!("still-valid")));
        assert!(navigator.paths.lock().unwrap().is_empty());
    }

    #[test]
    fn test_student_401_clears_student_data() {
        let (guard, store, _, _) = guard(AuthScope::Student);
        store.set(StorageKey::StudentToken, json!("s")).unwrap();
        store.set(StorageKey::StudentData, json!({"id": 9})).unwrap();
        store.set(StorageKey::Token, json!("teacher")).unwrap();

        guard.on_failure(RequestKind::Authenticated, &unauthorized());

        assert_eq!(store.get(StorageKey::StudentToken).unwrap(), None);
        assert_eq!(store.get(StorageKey::StudentData).unwrap(), None);
        assert_eq!(store.get(StorageKey::Token).unwrap(), Some(json!("teacher")));
    }

    #[test]
    fn test_other_errors_are_notified() {
        let (guard, _, navigator, notifier) = guard(AuthScope::Teacher);
        guard.on_failure(
            RequestKind::Authenticated,
            &ApiError::Validation {
                status: 422,
                messages: vec!["title: field required".into()],
            },
        );
        guard.on_failure(RequestKind::Authenticated, &ApiError::Network("timeout".into()));

        assert_eq!(
            notifier.notices(),
            vec![
                (NoticeLevel::Error, "title: field required".to_string()),
                (NoticeLevel::Error, "Network error".to_string()),
            ]
        );
        assert!(navigator.paths.lock().unwrap().is_empty());
    }
}
