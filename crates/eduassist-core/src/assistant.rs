//! Types for the two LLM-backed chat surfaces: the enhanced assistant and
//! the simple chatbot.

use crate::conversation::{ChatMessage, ChatRole};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much the backend assistant may do without explicit approval.
/// Forwarded verbatim; the client attaches no behaviour to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutonomyMode {
    Manual,
    #[default]
    Assist,
    Autonomous,
}

impl AutonomyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Assist => "assist",
            Self::Autonomous => "autonomous",
        }
    }
}

impl fmt::Display for AutonomyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutonomyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "assist" => Ok(Self::Assist),
            "autonomous" => Ok(Self::Autonomous),
            other => Err(format!("unknown autonomy mode '{other}'")),
        }
    }
}

/// One prior turn sent along with a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

impl From<&ChatMessage> for HistoryEntry {
    fn from(message: &ChatMessage) -> Self {
        let role = match message.role {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        };
        Self {
            role: role.to_string(),
            content: message.content.clone(),
        }
    }
}

/// Body of `POST /api/v1/gemini-assistant/enhanced-chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedChatRequest {
    pub message: String,
    pub autonomy_mode: AutonomyMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation_history: Vec<HistoryEntry>,
}

/// Reply from the enhanced assistant. Proposed actions stay opaque JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancedChatResponse {
    #[serde(default, alias = "message")]
    pub response: String,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub suggested_actions: Vec<serde_json::Value>,
}

/// Body of `POST /api/v1/gemini-assistant/approve-action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveActionRequest {
    pub action_id: String,
    pub approved: bool,
}

/// Body of `POST /api/v1/simple-chatbot/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleChatResponse {
    #[serde(default, alias = "reply", alias = "message")]
    pub response: String,
}
