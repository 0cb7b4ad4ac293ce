//! LLM-backed assistant endpoints.

use crate::client::ApiClient;
use crate::error::ApiError;
use eduassist_core::assistant::{
    ApproveActionRequest, EnhancedChatRequest, EnhancedChatResponse, SimpleChatRequest,
    SimpleChatResponse,
};
use serde_json::{Value, json};

/// One-click prompts offered by the enhanced assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    DailySummary,
    AtRiskStudents,
    UpcomingDeadlines,
    ParentUpdates,
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        Self::DailySummary,
        Self::AtRiskStudents,
        Self::UpcomingDeadlines,
        Self::ParentUpdates,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::DailySummary => "daily_summary",
            Self::AtRiskStudents => "at_risk_students",
            Self::UpcomingDeadlines => "upcoming_deadlines",
            Self::ParentUpdates => "parent_updates",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }
}

impl ApiClient {
    pub async fn enhanced_chat(
        &self,
        request: &EnhancedChatRequest,
    ) -> Result<EnhancedChatResponse, ApiError> {
        self.post("/api/v1/gemini-assistant/enhanced-chat", request)
            .await
    }

    pub async fn quick_action(&self, action: QuickAction) -> Result<EnhancedChatResponse, ApiError> {
        self.post(
            &format!("/api/v1/gemini-assistant/quick-actions/{}", action.id()),
            &json!({}),
        )
        .await
    }

    pub async fn approve_action(&self, request: &ApproveActionRequest) -> Result<Value, ApiError> {
        self.post("/api/v1/gemini-assistant/approve-action", request)
            .await
    }

    pub async fn assistant_settings(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/gemini-assistant/settings").await
    }

    pub async fn update_assistant_settings(&self, settings: &Value) -> Result<Value, ApiError> {
        self.put("/api/v1/gemini-assistant/settings", settings).await
    }

    pub async fn assistant_status(&self) -> Result<Value, ApiError> {
        self.get("/api/v1/gemini-assistant/enhanced-status").await
    }

    pub async fn simple_chat(&self, request: &SimpleChatRequest) -> Result<SimpleChatResponse, ApiError> {
        self.post("/api/v1/simple-chatbot/message", request).await
    }
}
