//! Chat transcripts persisted next to the conversation context.

use super::context::{ContextSnapshot, ConversationContext};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Transcripts older than this are discarded on restore.
pub const TRANSCRIPT_TTL_SECS: i64 = 60 * 60;

/// Most messages any stored chat history keeps.
pub const HISTORY_LIMIT: usize = 100;

/// Drops the oldest messages so at most `limit` remain.
pub fn keep_recent(messages: &mut Vec<ChatMessage>, limit: usize) {
    if messages.len() > limit {
        let excess = messages.len() - limit;
        messages.drain(..excess);
    }
}

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// A single chat bubble.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp,
        }
    }

    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(ChatRole::User, content, timestamp)
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(ChatRole::Assistant, content, timestamp)
    }
}

/// The visible chat history plus the time it was last saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTranscript {
    pub messages: Vec<ChatMessage>,
    pub saved_at: Option<DateTime<Utc>>,
}

impl ChatTranscript {
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
        keep_recent(&mut self.messages, HISTORY_LIMIT);
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.saved_at = Some(now);
    }

    /// A transcript without a save time is treated as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.saved_at {
            Some(saved_at) => now - saved_at > Duration::seconds(TRANSCRIPT_TTL_SECS),
            None => true,
        }
    }

    /// Returns the transcript if still fresh, otherwise an empty one.
    pub fn into_fresh(self, now: DateTime<Utc>) -> Self {
        if self.is_expired(now) {
            Self::default()
        } else {
            self
        }
    }
}

/// What the dashboard persists under `eduassist_messages`.
///
/// Only the transcript expires; the conversation context survives any
/// restart until the flow completes or is cancelled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardChatState {
    #[serde(default)]
    pub transcript: ChatTranscript,
    #[serde(default)]
    pub context: ContextSnapshot,
}

impl DashboardChatState {
    pub fn capture(
        transcript: &ChatTranscript,
        context: &ConversationContext,
        now: DateTime<Utc>,
    ) -> Self {
        let mut transcript = transcript.clone();
        transcript.touch(now);
        Self {
            transcript,
            context: context.to_snapshot(),
        }
    }

    pub fn restore(self, now: DateTime<Utc>) -> (ChatTranscript, ConversationContext) {
        (
            self.transcript.into_fresh(now),
            ConversationContext::from_snapshot(&self.context),
        )
    }
}
