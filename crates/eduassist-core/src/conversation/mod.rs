//! Conversational task-collection domain module.
//!
//! # Module Structure
//!
//! - `task`: task kinds, their field sequences, and typed task data
//! - `context`: the conversation context and its persisted snapshot
//! - `machine`: turn handling (`idle → collecting → confirming → idle`)
//! - `transcript`: chat messages and the persisted dashboard chat state

mod context;
mod machine;
mod task;
mod transcript;

pub use context::{ContextSnapshot, ConversationContext, ConversationPhase};
pub use machine::{
    AFFIRMATIVE_TOKENS, CANCEL_TOKENS, CANCELLED_TEXT, DashboardTab, HELP_TEXT, Turn, TurnAction,
    is_affirmative, is_cancel,
};
pub use task::{
    ComplianceData, EmailData, RecordData, SchedulingData, TaskData, TaskField, TaskKind,
};
pub use transcript::{
    ChatMessage, ChatRole, ChatTranscript, DashboardChatState, HISTORY_LIMIT,
    TRANSCRIPT_TTL_SECS, keep_recent,
};
