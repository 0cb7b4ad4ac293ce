//! Sections and student rosters.

use crate::client::ApiClient;
use crate::error::ApiError;
use serde_json::Value;

impl ApiClient {
    pub async fn sections(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/students/sections").await
    }

    pub async fn section_students(&self, section_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/api/v1/students/sections/{section_id}/students"))
            .await
    }

    pub async fn student_profile(&self, student_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/api/v1/students/students/{student_id}/profile"))
            .await
    }
}
