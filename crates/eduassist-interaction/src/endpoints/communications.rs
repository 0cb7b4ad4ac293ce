//! One-off and bulk communications.

use crate::client::ApiClient;
use crate::error::ApiError;
use eduassist_core::backend::EmailRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkStudentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Body of `POST /api/v1/bulk-communication/send`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkSendRequest {
    pub recipient_ids: Vec<String>,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub include_parents: bool,
}

impl ApiClient {
    pub async fn communications(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/communications/").await
    }

    pub async fn send_email(&self, request: &EmailRequest) -> Result<Value, ApiError> {
        self.post("/api/v1/communications/send-email", request).await
    }

    pub async fn bulk_sections(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/bulk-communication/sections").await
    }

    pub async fn bulk_students(&self, query: &BulkStudentQuery) -> Result<Value, ApiError> {
        self.get_with_query("/api/v1/bulk-communication/students", query)
            .await
    }

    pub async fn bulk_templates(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/bulk-communication/templates").await
    }

    pub async fn bulk_sent(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/bulk-communication/sent").await
    }

    pub async fn bulk_send(&self, request: &BulkSendRequest) -> Result<Value, ApiError> {
        self.post("/api/v1/bulk-communication/send", request).await
    }
}
