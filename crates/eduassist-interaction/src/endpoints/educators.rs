//! Teacher authentication and profile.

use crate::auth_guard::RequestKind;
use crate::client::ApiClient;
use crate::error::ApiError;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token grant shared by the teacher and student login endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default, alias = "user")]
    pub educator: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl ApiClient {
    /// `POST /api/v1/educators/login`. A 401 here is reported to the caller
    /// without clearing the session.
    pub async fn educator_login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send_json(
            Method::POST,
            "/api/v1/educators/login",
            request,
            RequestKind::Login,
        )
        .await
    }

    pub async fn educator_register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        self.send_json(
            Method::POST,
            "/api/v1/educators/register",
            request,
            RequestKind::Login,
        )
        .await
    }

    pub async fn educator_me(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/educators/me").await
    }

    pub async fn educator_profile(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/educators/profile").await
    }

    pub async fn update_educator_profile(&self, profile: &Value) -> Result<Value, ApiError> {
        self.put("/api/v1/educators/profile", profile).await
    }
}
