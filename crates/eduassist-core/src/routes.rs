//! Route shell: maps paths to screens and gates protected ones.

use crate::error::Result;
use crate::session_store::{SessionStore, SessionStoreExt, StorageKey};
use std::sync::atomic::{AtomicBool, Ordering};

pub const LOGIN_PATH: &str = "/login";

/// Top-level screens of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    PortalSelection,
    TeacherDashboard,
    StudentApp,
    NotFound,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/portal" => Self::PortalSelection,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" | "/teacher" => Self::TeacherDashboard,
            "/student" => Self::StudentApp,
            other if other.starts_with("/dashboard/") => Self::TeacherDashboard,
            other if other.starts_with("/student/") => Self::StudentApp,
            _ => Self::NotFound,
        }
    }

    /// Screens that need a teacher session. The student app runs its own login.
    pub fn is_protected(&self) -> bool {
        matches!(self, Self::TeacherDashboard)
    }
}

/// Outcome of resolving a path against the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(String),
}

/// Performs navigation on behalf of the client core.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Tracks the in-memory "is authenticated" flag and answers route checks
/// against it plus the persisted teacher token.
#[derive(Debug, Default)]
pub struct AuthState {
    authenticated: AtomicBool,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_authenticated(&self, value: bool) {
        self.authenticated.store(value, Ordering::SeqCst);
    }

    pub fn is_flagged(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Authenticated when the flag is set or a teacher token is persisted.
    pub fn is_authenticated(&self, store: &dyn SessionStore) -> Result<bool> {
        Ok(self.is_flagged() || store.get_string(StorageKey::Token)?.is_some())
    }

    pub fn resolve(&self, path: &str, store: &dyn SessionStore) -> Result<RouteDecision> {
        let route = Route::from_path(path);
        if route.is_protected() && !self.is_authenticated(store)? {
            tracing::debug!("[Routes] {} requires login, redirecting", path);
            return Ok(RouteDecision::Redirect(LOGIN_PATH.to_string()));
        }
        Ok(RouteDecision::Render(route))
    }
}
