//! Turn handling for the scripted assistant.
//!
//! `idle → collecting(task, step) → confirming → idle`. Each user message is
//! interpreted as the answer to the current step's question. Firing the
//! backend call is left to the caller: a confirmed task is handed back as
//! [`TurnAction::Submit`] with the context already reset.

use super::context::{ConversationContext, ConversationPhase};
use super::task::{TaskData, TaskField, TaskKind};

/// Replies that confirm the pending task.
pub const AFFIRMATIVE_TOKENS: &[&str] = &["yes", "confirm", "schedule it", "generate", "create", "send"];

/// Replies that abandon the flow from any collecting step.
pub const CANCEL_TOKENS: &[&str] = &["cancel", "stop", "no", "nevermind", "never mind", "abort"];

const STATS_KEYWORDS: &[&str] = &["stat", "overview", "dashboard", "summary"];

pub const HELP_TEXT: &str = "I can help you with:\n\
- Scheduling meetings (try \"schedule a meeting\")\n\
- Sending emails to students or parents (try \"send an email\")\n\
- Compliance reports (try \"compliance report\")\n\
- Creating student records (try \"create a record\")\n\
Ask for \"stats\" to jump to the overview.";

pub const CANCELLED_TEXT: &str = "No problem, I've cancelled that. What else can I help with?";

/// Dashboard tab the assistant can point the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    Overview,
}

/// Side effect requested by a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnAction {
    /// Fire exactly one backend create-call for the collected data.
    Submit(TaskData),
    /// Switch the dashboard to a tab.
    ShowTab(DashboardTab),
}

/// The assistant's response to one user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub reply: String,
    pub action: Option<TurnAction>,
}

impl Turn {
    fn reply(text: impl Into<String>) -> Self {
        Self {
            reply: text.into(),
            action: None,
        }
    }
}

/// Lowercases, trims and drops trailing punctuation.
fn normalize(message: &str) -> String {
    message
        .trim()
        .trim_end_matches(['.', '!', '?'])
        .trim()
        .to_lowercase()
}

/// True for an affirmative token, alone or leading the reply ("yes please").
pub fn is_affirmative(message: &str) -> bool {
    let text = normalize(message);
    AFFIRMATIVE_TOKENS.iter().any(|token| {
        text == *token
            || text
                .strip_prefix(token)
                .is_some_and(|rest| rest.starts_with([' ', ',']))
    })
}

pub fn is_cancel(message: &str) -> bool {
    let text = normalize(message);
    CANCEL_TOKENS.contains(&text.as_str())
}

impl ConversationContext {
    /// Interprets one user message and advances the flow.
    pub fn handle(&mut self, message: &str) -> Turn {
        let text = message.trim();
        if text.is_empty() {
            return Turn::reply("I didn't catch that. Could you type it again?");
        }

        match self.phase() {
            ConversationPhase::Idle => self.handle_idle(text),
            ConversationPhase::Collecting { task, step } => self.handle_collecting(task, step, text),
            ConversationPhase::Confirming { task } => self.handle_confirming(task, text),
        }
    }

    fn handle_idle(&mut self, text: &str) -> Turn {
        match TaskKind::detect(text) {
            Some(task) => {
                tracing::debug!("[Conversation] Starting {} flow", task);
                self.begin(task);
                let first = task.fields()[0];
                Turn::reply(format!("{} {}", task.intro(), first.prompt()))
            }
            None => general_query(text),
        }
    }

    fn handle_collecting(&mut self, task: TaskKind, step: usize, text: &str) -> Turn {
        if is_cancel(text) {
            tracing::debug!("[Conversation] {} flow cancelled at step {}", task, step);
            self.reset();
            return Turn::reply(CANCELLED_TEXT);
        }

        let fields = task.fields();
        let field = fields[step - 1];

        if field.is_optional() && is_affirmative(text) {
            self.skip_to_confirmation(task);
            return self.confirmation_prompt(task);
        }

        let stored = self
            .task_data
            .get_or_insert_with(|| TaskData::new(task))
            .set(field, text);
        if let Err(e) = stored {
            tracing::error!("[Conversation] {}", e);
            self.reset();
            return Turn::reply(format!("Sorry, something went wrong: {}", e.user_message()));
        }

        if let Some(pos) = self.required_fields.iter().position(|f| *f == field) {
            self.required_fields.remove(pos);
        }

        // the closing notes step keeps collecting until an affirmative
        if field == TaskField::Description && step == fields.len() {
            return Turn::reply(format!(
                "Noted. Add more detail, or reply 'yes' to review the {}.",
                task.label()
            ));
        }

        self.step += 1;
        match fields.get(self.step - 1) {
            Some(next) => Turn::reply(next.prompt()),
            None => self.confirmation_prompt(task),
        }
    }

    fn handle_confirming(&mut self, task: TaskKind, text: &str) -> Turn {
        let data = self.task_data.take();
        self.reset();

        match data {
            Some(data) if is_affirmative(text) => {
                tracing::debug!("[Conversation] {} flow confirmed", task);
                Turn {
                    reply: format!("Working on your {}...", task.label()),
                    action: Some(TurnAction::Submit(data)),
                }
            }
            _ => Turn::reply(CANCELLED_TEXT),
        }
    }

    fn confirmation_prompt(&self, task: TaskKind) -> Turn {
        let summary = self
            .task_data
            .as_ref()
            .map(TaskData::summary)
            .unwrap_or_default();
        Turn::reply(format!(
            "Here's the {}:\n{}\n{}, or anything else to cancel.",
            task.label(),
            summary,
            task.confirm_hint()
        ))
    }
}

fn general_query(text: &str) -> Turn {
    let lower = text.to_lowercase();
    if STATS_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Turn {
            reply: "Opening the overview tab with your class statistics.".to_string(),
            action: Some(TurnAction::ShowTab(DashboardTab::Overview)),
        };
    }
    Turn::reply(HELP_TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::task::TaskField;

    #[test]
    fn test_affirmative_tokens() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("Yes!"));
        assert!(is_affirmative("schedule it"));
        assert!(is_affirmative("send it"));
        assert!(is_affirmative("yes, please"));
        assert!(!is_affirmative("yesterday"));
        assert!(!is_affirmative("maybe"));
    }

    #[test]
    fn test_cancel_tokens_are_exact() {
        assert!(is_cancel("Cancel"));
        assert!(is_cancel("never mind."));
        assert!(!is_cancel("no homework this week"));
    }

    #[test]
    fn test_general_query_stats_shortcut() {
        let mut ctx = ConversationContext::new();
        let turn = ctx.handle("show me the stats");
        assert_eq!(turn.action, Some(TurnAction::ShowTab(DashboardTab::Overview)));
        assert!(ctx.is_idle());
    }

    #[test]
    fn test_general_query_help() {
        let mut ctx = ConversationContext::new();
        let turn = ctx.handle("hello there");
        assert_eq!(turn.reply, HELP_TEXT);
        assert_eq!(turn.action, None);
        assert!(ctx.is_idle());
    }

    #[test]
    fn test_optional_step_accepts_affirmative_skip() {
        let mut ctx = ConversationContext::new();
        ctx.handle("schedule a meeting");
        ctx.handle("Parent conference");
        ctx.handle("mr.smith@example.com");
        ctx.handle("tomorrow");
        ctx.handle("2:00 PM");
        let turn = ctx.handle("yes");

        assert_eq!(
            ctx.phase(),
            ConversationPhase::Confirming {
                task: TaskKind::Scheduling
            }
        );
        assert!(turn.reply.contains("Parent conference"));
        assert!(ctx.required_fields().is_empty());
        assert_eq!(ctx.task_data().unwrap().get(TaskField::Duration), None);
    }

    #[test]
    fn test_affirmative_at_required_step_is_stored_verbatim() {
        let mut ctx = ConversationContext::new();
        ctx.handle("email");
        ctx.handle("yes");
        assert_eq!(ctx.task_data().unwrap().get(TaskField::Recipients), Some("yes"));
        assert_eq!(ctx.step(), 2);
    }

    #[test]
    fn test_closing_notes_accumulate_until_affirmative() {
        let mut ctx = ConversationContext::new();
        ctx.handle("compliance");
        ctx.handle("grading");
        ctx.handle("Q1");
        let turn = ctx.handle("Flag missing rubrics");
        assert!(turn.reply.starts_with("Noted."));
        ctx.handle("Also list late submissions");

        assert_eq!(
            ctx.phase(),
            ConversationPhase::Collecting {
                task: TaskKind::Compliance,
                step: 3
            }
        );

        let turn = ctx.handle("yes");
        assert_eq!(turn.action, None);
        assert_eq!(
            ctx.phase(),
            ConversationPhase::Confirming {
                task: TaskKind::Compliance
            }
        );
        assert!(turn.reply.contains("Also list late submissions"));
    }

    #[test]
    fn test_empty_message_does_not_advance() {
        let mut ctx = ConversationContext::new();
        ctx.handle("email");
        ctx.handle("   ");
        assert_eq!(ctx.step(), 1);
    }
}
