//! The two LLM-backed chats: the enhanced assistant (with autonomy modes
//! and approvals) and the simple chatbot.

use chrono::{DateTime, Utc};
use eduassist_core::Result;
use eduassist_core::assistant::{
    ApproveActionRequest, AutonomyMode, EnhancedChatRequest, EnhancedChatResponse, HistoryEntry,
    SimpleChatRequest,
};
use eduassist_core::conversation::{ChatMessage, ChatTranscript, HISTORY_LIMIT, keep_recent};
use eduassist_core::session_store::{SessionStore, SessionStoreExt, StorageKey};
use eduassist_interaction::ApiClient;
use eduassist_interaction::endpoints::QuickAction;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Chat with the backend assistant. History lives under
/// `educator_ai_chat` and expires an hour after the last save.
pub struct EnhancedAssistantService {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    transcript: Mutex<ChatTranscript>,
    autonomy: Mutex<AutonomyMode>,
}

impl EnhancedAssistantService {
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>, now: DateTime<Utc>) -> Self {
        let transcript = load_transcript(store.as_ref(), StorageKey::EducatorAiChat).into_fresh(now);
        Self {
            client,
            store,
            transcript: Mutex::new(transcript),
            autonomy: Mutex::new(AutonomyMode::default()),
        }
    }

    pub async fn autonomy(&self) -> AutonomyMode {
        *self.autonomy.lock().await
    }

    pub async fn set_autonomy(&self, mode: AutonomyMode) {
        tracing::debug!("[EnhancedAssistant] Autonomy mode -> {}", mode);
        *self.autonomy.lock().await = mode;
    }

    pub async fn send(&self, message: &str, now: DateTime<Utc>) -> Result<EnhancedChatResponse> {
        let mut transcript = self.transcript.lock().await;
        let request = EnhancedChatRequest {
            message: message.to_string(),
            autonomy_mode: self.autonomy().await,
            conversation_history: transcript.messages.iter().map(HistoryEntry::from).collect(),
        };

        // the turn is recorded only once the backend has answered
        let response = self.client.enhanced_chat(&request).await?;
        transcript.push(ChatMessage::user(message, now));
        transcript.push(ChatMessage::assistant(response.response.clone(), now));
        self.persist(&mut transcript, now);
        Ok(response)
    }

    pub async fn quick_action(&self, action: QuickAction, now: DateTime<Utc>) -> Result<EnhancedChatResponse> {
        let response = self.client.quick_action(action).await?;
        let mut transcript = self.transcript.lock().await;
        transcript.push(ChatMessage::assistant(response.response.clone(), now));
        self.persist(&mut transcript, now);
        Ok(response)
    }

    pub async fn approve(&self, action_id: &str, approved: bool) -> Result<Value> {
        Ok(self
            .client
            .approve_action(&ApproveActionRequest {
                action_id: action_id.to_string(),
                approved,
            })
            .await?)
    }

    pub async fn settings(&self) -> Result<Value> {
        Ok(self.client.assistant_settings().await?)
    }

    pub async fn update_settings(&self, settings: &Value) -> Result<Value> {
        Ok(self.client.update_assistant_settings(settings).await?)
    }

    pub async fn status(&self) -> Result<Value> {
        Ok(self.client.assistant_status().await?)
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.transcript.lock().await.messages.clone()
    }

    pub async fn clear(&self) -> Result<()> {
        *self.transcript.lock().await = ChatTranscript::default();
        self.store.clear(StorageKey::EducatorAiChat)
    }

    fn persist(&self, transcript: &mut ChatTranscript, now: DateTime<Utc>) {
        transcript.touch(now);
        if let Err(e) = self.store.set_json(StorageKey::EducatorAiChat, &*transcript) {
            tracing::warn!("[EnhancedAssistant] Failed to persist history: {}", e);
        }
    }
}

/// The floating chatbot. History under `simple_chatbot_history_v1` never
/// expires but is capped at [`HISTORY_LIMIT`] messages.
pub struct SimpleChatService {
    client: ApiClient,
    store: Arc<dyn SessionStore>,
    history: Mutex<Vec<ChatMessage>>,
}

impl SimpleChatService {
    pub fn new(client: ApiClient, store: Arc<dyn SessionStore>) -> Self {
        let mut history = store
            .get_json::<Vec<ChatMessage>>(StorageKey::SimpleChatbotHistory)
            .unwrap_or_else(|e| {
                tracing::warn!("[SimpleChat] Discarding unreadable history: {}", e);
                None
            })
            .unwrap_or_default();
        keep_recent(&mut history, HISTORY_LIMIT);
        Self {
            client,
            store,
            history: Mutex::new(history),
        }
    }

    pub async fn send(&self, message: &str, now: DateTime<Utc>) -> Result<String> {
        let mut history = self.history.lock().await;
        let response = self
            .client
            .simple_chat(&SimpleChatRequest {
                message: message.to_string(),
            })
            .await?;

        history.push(ChatMessage::user(message, now));
        history.push(ChatMessage::assistant(response.response.clone(), now));
        keep_recent(&mut history, HISTORY_LIMIT);
        if let Err(e) = self.store.set_json(StorageKey::SimpleChatbotHistory, &*history) {
            tracing::warn!("[SimpleChat] Failed to persist history: {}", e);
        }
        Ok(response.response)
    }

    pub async fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().await.clone()
    }

    pub async fn clear(&self) -> Result<()> {
        self.history.lock().await.clear();
        self.store.clear(StorageKey::SimpleChatbotHistory)
    }
}

fn load_transcript(store: &dyn SessionStore, key: StorageKey) -> ChatTranscript {
    store
        .get_json::<ChatTranscript>(key)
        .unwrap_or_else(|e| {
            tracing::warn!("[EnhancedAssistant] Discarding unreadable history: {}", e);
            None
        })
        .unwrap_or_default()
}
