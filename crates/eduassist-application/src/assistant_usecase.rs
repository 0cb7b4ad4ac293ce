//! The dashboard's scripted assistant.
//!
//! Wraps a [`ConversationContext`] and its transcript, fires the backend
//! call for confirmed tasks and persists both under `eduassist_messages`
//! after every turn.

use chrono::{DateTime, Local, Utc};
use eduassist_core::backend::{self, AssistantBackend, TaskSubmission};
use eduassist_core::conversation::{
    ChatMessage, ChatTranscript, ConversationContext, DashboardChatState, DashboardTab, TurnAction,
};
use eduassist_core::session_store::{SessionStore, SessionStoreExt, StorageKey};
use eduassist_core::{EduError, Result};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

/// What the UI renders after one message.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    pub text: String,
    /// Tab the dashboard should switch to, if any.
    pub show_tab: Option<DashboardTab>,
    /// Backend response of a completed task.
    pub submitted: Option<Value>,
}

struct ChatSession {
    transcript: ChatTranscript,
    context: ConversationContext,
}

pub struct AssistantUseCase {
    backend: Arc<dyn AssistantBackend>,
    store: Arc<dyn SessionStore>,
    session: Mutex<ChatSession>,
}

impl AssistantUseCase {
    pub fn new(backend: Arc<dyn AssistantBackend>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            backend,
            store,
            session: Mutex::new(ChatSession {
                transcript: ChatTranscript::default(),
                context: ConversationContext::new(),
            }),
        }
    }

    /// Rebuilds the assistant from the persisted state. Messages older than
    /// an hour are dropped; an in-progress flow is kept.
    pub fn restore(
        backend: Arc<dyn AssistantBackend>,
        store: Arc<dyn SessionStore>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let saved: Option<DashboardChatState> =
            match store.get_json(StorageKey::EduassistMessages) {
                Ok(saved) => saved,
                Err(EduError::Serialization { message, .. }) => {
                    tracing::warn!("[Assistant] Discarding unreadable chat state: {}", message);
                    None
                }
                Err(e) => return Err(e),
            };
        let (transcript, context) = saved.unwrap_or_default().restore(now);
        tracing::debug!(
            "[Assistant] Restored {} message(s), phase {:?}",
            transcript.messages.len(),
            context.phase()
        );

        Ok(Self {
            backend,
            store,
            session: Mutex::new(ChatSession {
                transcript,
                context,
            }),
        })
    }

    pub async fn send(&self, message: &str) -> AssistantReply {
        self.send_at(message, Local::now()).await
    }

    /// Handles one user message as of `now`. Relative dates in a meeting
    /// resolve against `now`'s local date.
    pub async fn send_at(&self, message: &str, now: DateTime<Local>) -> AssistantReply {
        let timestamp = now.with_timezone(&Utc);
        let mut session = self.session.lock().await;
        session.transcript.push(ChatMessage::user(message, timestamp));

        let turn = session.context.handle(message);
        let reply = match turn.action {
            Some(TurnAction::Submit(data)) => {
                let submission = TaskSubmission::from_task_data(&data, now.date_naive());
                self.complete(&submission).await
            }
            Some(TurnAction::ShowTab(tab)) => AssistantReply {
                text: turn.reply,
                show_tab: Some(tab),
                submitted: None,
            },
            None => AssistantReply {
                text: turn.reply,
                show_tab: None,
                submitted: None,
            },
        };

        session
            .transcript
            .push(ChatMessage::assistant(reply.text.clone(), timestamp));
        self.persist(&session, timestamp);
        reply
    }

    /// Fires the single backend call for a confirmed task. Failures become
    /// the reply; nothing is retried.
    async fn complete(&self, submission: &TaskSubmission) -> AssistantReply {
        match backend::submit(self.backend.as_ref(), submission).await {
            Ok(response) => AssistantReply {
                text: success_text(submission),
                show_tab: None,
                submitted: Some(response),
            },
            Err(EduError::FeatureDisabled(message)) => AssistantReply {
                text: message,
                show_tab: None,
                submitted: None,
            },
            Err(e) => {
                tracing::error!("[Assistant] Task submission failed: {}", e);
                AssistantReply {
                    text: format!("Sorry, I couldn't complete that. {}", e.user_message()),
                    show_tab: None,
                    submitted: None,
                }
            }
        }
    }

    fn persist(&self, session: &ChatSession, now: DateTime<Utc>) {
        let state = DashboardChatState::capture(&session.transcript, &session.context, now);
        if let Err(e) = self.store.set_json(StorageKey::EduassistMessages, &state) {
            tracing::warn!("[Assistant] Failed to persist chat state: {}", e);
        }
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.session.lock().await.transcript.messages.clone()
    }

    pub async fn context(&self) -> ConversationContext {
        self.session.lock().await.context.clone()
    }

    /// Clears the transcript and abandons any in-progress flow.
    pub async fn clear(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        session.transcript = ChatTranscript::default();
        session.context.reset();
        self.store.clear(StorageKey::EduassistMessages)
    }
}

fn success_text(submission: &TaskSubmission) -> String {
    match submission {
        TaskSubmission::Meeting(meeting) => format!(
            "Done! \"{}\" is scheduled for {} ({} min).",
            meeting.title,
            meeting.start_datetime.format("%A, %B %-d at %-I:%M %p"),
            meeting.duration_minutes()
        ),
        TaskSubmission::Email(email) => format!(
            "Done! \"{}\" was sent to {} recipient(s).",
            email.subject,
            email.recipients.len()
        ),
        TaskSubmission::Compliance(report) => {
            format!("Done! Your {} report for {} is ready.", report.report_type, report.period)
        }
        TaskSubmission::Record(record) => {
            format!("Done! The {} record for {} was created.", record.record_type, record.student)
        }
    }
}
