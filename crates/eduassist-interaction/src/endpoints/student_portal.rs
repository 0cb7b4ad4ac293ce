//! Student login and the student dashboard. Used with an
//! [`AuthScope::Student`](crate::auth_guard::AuthScope) client.

use crate::auth_guard::RequestKind;
use crate::client::ApiClient;
use crate::endpoints::educators::LoginRequest;
use crate::error::ApiError;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentLoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub student: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTeacherRequest {
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
}

impl ApiClient {
    pub async fn student_login(&self, request: &LoginRequest) -> Result<StudentLoginResponse, ApiError> {
        self.send_json(
            Method::POST,
            "/api/v1/student-auth/login",
            request,
            RequestKind::Login,
        )
        .await
    }

    pub async fn student_dashboard_profile(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/student-dashboard/profile").await
    }

    pub async fn student_marks(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/student-dashboard/marks").await
    }

    pub async fn student_notifications(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/student-dashboard/notifications").await
    }

    pub async fn student_scheduled_events(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/student-dashboard/scheduled-events").await
    }

    pub async fn student_reports(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/student-dashboard/reports").await
    }

    pub async fn contact_teacher(&self, request: &ContactTeacherRequest) -> Result<Value, ApiError> {
        self.post("/api/v1/student-dashboard/contact-teacher", request)
            .await
    }
}
