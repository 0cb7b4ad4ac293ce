//! Performance analytics and report delivery.

use crate::client::ApiClient;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Body of `POST /api/v1/performance/filtered`. Unset filters are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReportRequest {
    pub student_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub include_parents: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl ApiClient {
    pub async fn performance_overview(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/performance/overview").await
    }

    pub async fn filtered_performance(&self, filter: &PerformanceFilter) -> Result<Value, ApiError> {
        self.post("/api/v1/performance/filtered", filter).await
    }

    pub async fn student_performance(&self, student_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/api/v1/performance/student/{student_id}"))
            .await
    }

    pub async fn send_report(&self, request: &SendReportRequest) -> Result<Value, ApiError> {
        self.post("/api/v1/performance/send-report", request).await
    }

    pub async fn sent_reports(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/performance/sent-reports").await
    }

    /// Raw report file for one student.
    pub async fn download_student_report(
        &self,
        student_id: &str,
        format: ReportFormat,
    ) -> Result<Vec<u8>, ApiError> {
        self.get_bytes(&format!(
            "/api/v1/performance/student/{student_id}/report-download?format={format}"
        ))
        .await
    }
}
