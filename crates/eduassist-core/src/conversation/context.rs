//! Conversation context: which scripted flow is active and how far along it is.

use super::task::{TaskData, TaskField, TaskKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the conversation currently stands, derived from `active_task` and `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationPhase {
    Idle,
    Collecting { task: TaskKind, step: usize },
    Confirming { task: TaskKind },
}

/// In-memory scratch state for the scripted assistant.
///
/// `step` is 1-based while collecting; once it passes the last field the
/// flow is waiting for confirmation. `required_fields` lists what is still
/// expected but is informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    pub(crate) active_task: Option<TaskKind>,
    pub(crate) task_data: Option<TaskData>,
    pub(crate) step: usize,
    pub(crate) required_fields: Vec<TaskField>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_task(&self) -> Option<TaskKind> {
        self.active_task
    }

    pub fn task_data(&self) -> Option<&TaskData> {
        self.task_data.as_ref()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn required_fields(&self) -> &[TaskField] {
        &self.required_fields
    }

    pub fn phase(&self) -> ConversationPhase {
        match self.active_task {
            None => ConversationPhase::Idle,
            Some(task) if self.step > task.fields().len() => ConversationPhase::Confirming { task },
            Some(task) => ConversationPhase::Collecting {
                task,
                step: self.step.max(1),
            },
        }
    }

    pub fn is_idle(&self) -> bool {
        self.active_task.is_none()
    }

    /// Returns to the initial shape: no task, no data, step 0, no required fields.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn begin(&mut self, task: TaskKind) {
        self.active_task = Some(task);
        self.task_data = Some(TaskData::new(task));
        self.step = 1;
        self.required_fields = task.fields().to_vec();
    }

    pub(crate) fn skip_to_confirmation(&mut self, task: TaskKind) {
        self.step = task.fields().len() + 1;
        self.required_fields.clear();
    }

    pub fn to_snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            active_task: self.active_task,
            task_data: self
                .task_data
                .as_ref()
                .map(TaskData::to_map)
                .unwrap_or_default(),
            step: self.step,
            required_fields: self
                .required_fields
                .iter()
                .map(|field| field.key().to_string())
                .collect(),
        }
    }

    /// Rebuilds a context from its persisted form.
    ///
    /// A snapshot whose step does not fit its task is treated as corrupt and
    /// yields an idle context.
    pub fn from_snapshot(snapshot: &ContextSnapshot) -> Self {
        let Some(task) = snapshot.active_task else {
            return Self::default();
        };
        if snapshot.step == 0 || snapshot.step > task.fields().len() + 1 {
            tracing::warn!(
                "[Conversation] Discarding persisted context with out-of-range step {} for {}",
                snapshot.step,
                task
            );
            return Self::default();
        }

        Self {
            active_task: Some(task),
            task_data: Some(TaskData::from_map(task, &snapshot.task_data)),
            step: snapshot.step,
            required_fields: snapshot
                .required_fields
                .iter()
                .filter_map(|key| TaskField::from_key(key))
                .collect(),
        }
    }
}

/// Persisted (open-map) form of [`ConversationContext`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    pub active_task: Option<TaskKind>,
    #[serde(default)]
    pub task_data: BTreeMap<String, String>,
    #[serde(default)]
    pub step: usize,
    #[serde(default)]
    pub required_fields: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reset_shape_serializes_as_empty_context() {
        let snapshot = ConversationContext::new().to_snapshot();
        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({"activeTask": null, "taskData": {}, "step": 0, "requiredFields": []})
        );
    }

    #[test]
    fn test_phase_follows_step() {
        let mut ctx = ConversationContext::new();
        assert_eq!(ctx.phase(), ConversationPhase::Idle);

        ctx.begin(TaskKind::Email);
        assert_eq!(
            ctx.phase(),
            ConversationPhase::Collecting {
                task: TaskKind::Email,
                step: 1
            }
        );

        ctx.skip_to_confirmation(TaskKind::Email);
        assert_eq!(
            ctx.phase(),
            ConversationPhase::Confirming {
                task: TaskKind::Email
            }
        );
    }

    #[test]
    fn test_snapshot_round_trip_resumes_flow() {
        let mut ctx = ConversationContext::new();
        ctx.begin(TaskKind::Scheduling);
        ctx.task_data
            .as_mut()
            .unwrap()
            .set(TaskField::Title, "Parent conference")
            .unwrap();
        ctx.step = 2;
        ctx.required_fields.remove(0);

        let json = serde_json::to_string(&ctx.to_snapshot()).unwrap();
        let snapshot: ContextSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(ConversationContext::from_snapshot(&snapshot), ctx);
    }

    #[test]
    fn test_out_of_range_snapshot_is_discarded() {
        let snapshot = ContextSnapshot {
            active_task: Some(TaskKind::Email),
            task_data: BTreeMap::new(),
            step: 42,
            required_fields: vec![],
        };
        assert!(ConversationContext::from_snapshot(&snapshot).is_idle());
    }
}
