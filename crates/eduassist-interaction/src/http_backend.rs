//! [`AssistantBackend`] over the REST API.

use crate::client::ApiClient;
use async_trait::async_trait;
use eduassist_core::backend::{
    AssistantBackend, ComplianceRequest, EmailRequest, MeetingRequest, RecordRequest,
};
use eduassist_core::{EduError, Result};
use serde_json::Value;

pub const COMPLIANCE_DISABLED_MESSAGE: &str =
    "Compliance report generation isn't available yet. Your request was not submitted.";
pub const RECORDS_DISABLED_MESSAGE: &str =
    "Student record creation isn't available yet. Your request was not submitted.";

/// Meetings and emails go to the backend; compliance reports and records
/// have no backend endpoint and resolve to [`EduError::FeatureDisabled`].
#[derive(Clone)]
pub struct HttpAssistantBackend {
    client: ApiClient,
}

impl HttpAssistantBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssistantBackend for HttpAssistantBackend {
    async fn create_meeting(&self, request: &MeetingRequest) -> Result<Value> {
        tracing::info!(
            "[Assistant] Creating meeting '{}' at {}",
            request.title,
            request.start_datetime
        );
        Ok(self.client.create_meeting(request).await?)
    }

    async fn send_email(&self, request: &EmailRequest) -> Result<Value> {
        tracing::info!(
            "[Assistant] Sending email '{}' to {} recipient(s)",
            request.subject,
            request.recipients.len()
        );
        Ok(self.client.send_email(request).await?)
    }

    async fn generate_compliance_report(&self, request: &ComplianceRequest) -> Result<Value> {
        tracing::debug!("[Assistant] Compliance report '{}' skipped", request.report_type);
        Err(EduError::FeatureDisabled(COMPLIANCE_DISABLED_MESSAGE.to_string()))
    }

    async fn create_record(&self, request: &RecordRequest) -> Result<Value> {
        tracing::debug!("[Assistant] Record '{}' skipped", request.record_type);
        Err(EduError::FeatureDisabled(RECORDS_DISABLED_MESSAGE.to_string()))
    }
}
