//! Calendar, meetings and tasks.

use crate::client::ApiClient;
use crate::error::ApiError;
use chrono::NaiveDate;
use eduassist_core::backend::MeetingRequest;
use serde::Serialize;
use serde_json::Value;

/// Query for `GET /api/v1/scheduling/calendar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ApiClient {
    pub async fn calendar(&self, range: &CalendarRange) -> Result<Value, ApiError> {
        self.get_with_query("/api/v1/scheduling/calendar", range).await
    }

    pub async fn create_meeting(&self, request: &MeetingRequest) -> Result<Value, ApiError> {
        self.post("/api/v1/scheduling/", request).await
    }

    pub async fn tasks(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/scheduling/tasks").await
    }

    pub async fn create_task(&self, task: &Value) -> Result<Value, ApiError> {
        self.post("/api/v1/scheduling/tasks", task).await
    }

    pub async fn update_task(&self, task_id: &str, task: &Value) -> Result<Value, ApiError> {
        self.put(&format!("/api/v1/scheduling/tasks/{task_id}"), task)
            .await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/api/v1/scheduling/tasks/{task_id}"))
            .await
    }
}
