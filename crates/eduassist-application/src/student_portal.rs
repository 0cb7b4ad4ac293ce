//! The student app: login plus the dashboard tabs.

use eduassist_core::session_store::{SessionStore, SessionStoreExt, StorageKey};
use eduassist_core::{EduError, Result};
use eduassist_interaction::ApiClient;
use eduassist_interaction::endpoints::{ContactTeacherRequest, LoginRequest};
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentTab {
    Profile,
    Marks,
    Reports,
    Notifications,
    Schedule,
}

impl StudentTab {
    pub const ALL: [StudentTab; 5] = [
        Self::Profile,
        Self::Marks,
        Self::Reports,
        Self::Notifications,
        Self::Schedule,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Marks => "marks",
            Self::Reports => "reports",
            Self::Notifications => "notifications",
            Self::Schedule => "schedule",
        }
    }
}

impl fmt::Display for StudentTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudentTab {
    type Err = EduError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| EduError::Validation(vec![format!("unknown tab '{s}'")]))
    }
}

/// Wraps a client scoped to the student token.
pub struct StudentPortal {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
}

impl StudentPortal {
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    /// Signs the student in and stores `studentToken` and `studentData`.
    pub async fn login(&self, email: &str, password: &str) -> Result<Value> {
        let response = self
            .client
            .student_login(&LoginRequest {
                email: email.trim().to_string(),
                password: password.to_string(),
            })
            .await?;

        let student = response.student.unwrap_or(Value::Null);
        self.store
            .set(StorageKey::StudentToken, json!(response.access_token))?;
        self.store.set(StorageKey::StudentData, student.clone())?;
        tracing::info!("[StudentPortal] Signed in as {}", email.trim());
        Ok(student)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear(StorageKey::StudentToken)?;
        self.store.clear(StorageKey::StudentData)
    }

    pub fn is_signed_in(&self) -> Result<bool> {
        Ok(self.store.get_string(StorageKey::StudentToken)?.is_some())
    }

    pub fn current_student(&self) -> Result<Option<Value>> {
        Ok(self
            .store
            .get(StorageKey::StudentData)?
            .filter(|student| !student.is_null()))
    }

    pub async fn tab(&self, tab: StudentTab) -> Result<Value> {
        let data = match tab {
            StudentTab::Profile => self.client.student_dashboard_profile().await?,
            StudentTab::Marks => self.client.student_marks().await?,
            StudentTab::Reports => self.client.student_reports().await?,
            StudentTab::Notifications => self.client.student_notifications().await?,
            StudentTab::Schedule => self.client.student_scheduled_events().await?,
        };
        Ok(data)
    }

    pub async fn contact_teacher(&self, request: &ContactTeacherRequest) -> Result<Value> {
        Ok(self.client.contact_teacher(request).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_parsing() {
        assert_eq!("Marks".parse::<StudentTab>().unwrap(), StudentTab::Marks);
        assert_eq!(" schedule ".parse::<StudentTab>().unwrap(), StudentTab::Schedule);
        assert!("grades".parse::<StudentTab>().is_err());
    }
}
