//! Task kinds, their field sequences, and the collected task data.

use crate::error::{EduError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the four scripted flows the assistant can walk through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Scheduling,
    Email,
    Compliance,
    Record,
}

const SCHEDULING_FIELDS: &[TaskField] = &[
    TaskField::Title,
    TaskField::Participants,
    TaskField::Date,
    TaskField::Time,
    TaskField::Duration,
    TaskField::Location,
    TaskField::Description,
];
const EMAIL_FIELDS: &[TaskField] = &[TaskField::Recipients, TaskField::Subject, TaskField::Message];
const COMPLIANCE_FIELDS: &[TaskField] = &[
    TaskField::ReportType,
    TaskField::Period,
    TaskField::Description,
];
const RECORD_FIELDS: &[TaskField] = &[TaskField::RecordType, TaskField::Student, TaskField::Details];

impl TaskKind {
    /// Matches trigger keywords (case-insensitive substrings) in priority order.
    pub fn detect(message: &str) -> Option<Self> {
        let lower = message.to_lowercase();
        let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if any(&["schedule", "meeting"]) {
            Some(Self::Scheduling)
        } else if any(&["email", "send", "notify"]) {
            Some(Self::Email)
        } else if any(&["report", "compliance"]) {
            Some(Self::Compliance)
        } else if any(&["record", "file"]) {
            Some(Self::Record)
        } else {
            None
        }
    }

    /// The fixed prompt sequence for this task.
    pub fn fields(self) -> &'static [TaskField] {
        match self {
            Self::Scheduling => SCHEDULING_FIELDS,
            Self::Email => EMAIL_FIELDS,
            Self::Compliance => COMPLIANCE_FIELDS,
            Self::Record => RECORD_FIELDS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Scheduling => "meeting",
            Self::Email => "email",
            Self::Compliance => "compliance report",
            Self::Record => "record",
        }
    }

    pub(crate) fn intro(self) -> &'static str {
        match self {
            Self::Scheduling => "Let's schedule a meeting.",
            Self::Email => "Let's send an email.",
            Self::Compliance => "Let's put together a compliance report.",
            Self::Record => "Let's create a record.",
        }
    }

    pub(crate) fn confirm_hint(self) -> &'static str {
        match self {
            Self::Scheduling => "Reply 'yes' or 'schedule it' to book it",
            Self::Email => "Reply 'yes' or 'send' to send it",
            Self::Compliance => "Reply 'yes' or 'generate' to generate it",
            Self::Record => "Reply 'yes' or 'create' to create it",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single answer slot in a task flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    Title,
    Participants,
    Date,
    Time,
    Duration,
    Location,
    Description,
    Recipients,
    Subject,
    Message,
    ReportType,
    Period,
    RecordType,
    Student,
    Details,
}

impl TaskField {
    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Participants => "participants",
            Self::Date => "date",
            Self::Time => "time",
            Self::Duration => "duration",
            Self::Location => "location",
            Self::Description => "description",
            Self::Recipients => "recipients",
            Self::Subject => "subject",
            Self::Message => "message",
            Self::ReportType => "report_type",
            Self::Period => "period",
            Self::RecordType => "record_type",
            Self::Student => "student",
            Self::Details => "details",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        const ALL: [TaskField; 15] = [
            TaskField::Title,
            TaskField::Participants,
            TaskField::Date,
            TaskField::Time,
            TaskField::Duration,
            TaskField::Location,
            TaskField::Description,
            TaskField::Recipients,
            TaskField::Subject,
            TaskField::Message,
            TaskField::ReportType,
            TaskField::Period,
            TaskField::RecordType,
            TaskField::Student,
            TaskField::Details,
        ];
        ALL.into_iter().find(|field| field.key() == key)
    }

    /// Optional fields accept an affirmative reply to skip ahead to confirmation.
    pub fn is_optional(self) -> bool {
        matches!(self, Self::Duration | Self::Location | Self::Description)
    }

    pub(crate) fn prompt(self) -> &'static str {
        match self {
            Self::Title => "What is the meeting about? Give me a title.",
            Self::Participants => "Who should attend? (names or emails, comma separated)",
            Self::Date => "What day? (e.g. today, tomorrow, next week)",
            Self::Time => "What time? (e.g. 2:00 PM)",
            Self::Duration => "How long? (e.g. 45 minutes, 2 hours) Say 'yes' to skip the optional details.",
            Self::Location => "Where will it take place? Say 'yes' to skip.",
            Self::Description => "Any notes or agenda to include? Say 'yes' to skip.",
            Self::Recipients => "Who should receive the email? (emails, comma separated)",
            Self::Subject => "What is the subject?",
            Self::Message => "What should the message say?",
            Self::ReportType => "Which compliance report do you need? (e.g. attendance, grading)",
            Self::Period => "For which period? (e.g. this term, March)",
            Self::RecordType => "What kind of record? (e.g. behaviour, academic)",
            Self::Student => "Which student is this record for?",
            Self::Details => "What should the record say?",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Participants => "Participants",
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Duration => "Duration",
            Self::Location => "Location",
            Self::Description => "Notes",
            Self::Recipients => "To",
            Self::Subject => "Subject",
            Self::Message => "Message",
            Self::ReportType => "Report",
            Self::Period => "Period",
            Self::RecordType => "Record type",
            Self::Student => "Student",
            Self::Details => "Details",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingData {
    pub title: Option<String>,
    pub participants: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub duration: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailData {
    pub recipients: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceData {
    pub report_type: Option<String>,
    pub period: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordData {
    pub record_type: Option<String>,
    pub student: Option<String>,
    pub details: Option<String>,
}

/// Field values collected for the active task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskData {
    Scheduling(SchedulingData),
    Email(EmailData),
    Compliance(ComplianceData),
    Record(RecordData),
}

impl TaskData {
    pub fn new(kind: TaskKind) -> Self {
        match kind {
            TaskKind::Scheduling => Self::Scheduling(SchedulingData::default()),
            TaskKind::Email => Self::Email(EmailData::default()),
            TaskKind::Compliance => Self::Compliance(ComplianceData::default()),
            TaskKind::Record => Self::Record(RecordData::default()),
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Scheduling(_) => TaskKind::Scheduling,
            Self::Email(_) => TaskKind::Email,
            Self::Compliance(_) => TaskKind::Compliance,
            Self::Record(_) => TaskKind::Record,
        }
    }

    fn slot(&mut self, field: TaskField) -> Option<&mut Option<String>> {
        match (self, field) {
            (Self::Scheduling(d), TaskField::Title) => Some(&mut d.title),
            (Self::Scheduling(d), TaskField::Participants) => Some(&mut d.participants),
            (Self::Scheduling(d), TaskField::Date) => Some(&mut d.date),
            (Self::Scheduling(d), TaskField::Time) => Some(&mut d.time),
            (Self::Scheduling(d), TaskField::Duration) => Some(&mut d.duration),
            (Self::Scheduling(d), TaskField::Location) => Some(&mut d.location),
            (Self::Scheduling(d), TaskField::Description) => Some(&mut d.description),
            (Self::Email(d), TaskField::Recipients) => Some(&mut d.recipients),
            (Self::Email(d), TaskField::Subject) => Some(&mut d.subject),
            (Self::Email(d), TaskField::Message) => Some(&mut d.message),
            (Self::Compliance(d), TaskField::ReportType) => Some(&mut d.report_type),
            (Self::Compliance(d), TaskField::Period) => Some(&mut d.period),
            (Self::Compliance(d), TaskField::Description) => Some(&mut d.description),
            (Self::Record(d), TaskField::RecordType) => Some(&mut d.record_type),
            (Self::Record(d), TaskField::Student) => Some(&mut d.student),
            (Self::Record(d), TaskField::Details) => Some(&mut d.details),
            _ => None,
        }
    }

    pub fn get(&self, field: TaskField) -> Option<&str> {
        let value = match (self, field) {
            (Self::Scheduling(d), TaskField::Title) => &d.title,
            (Self::Scheduling(d), TaskField::Participants) => &d.participants,
            (Self::Scheduling(d), TaskField::Date) => &d.date,
            (Self::Scheduling(d), TaskField::Time) => &d.time,
            (Self::Scheduling(d), TaskField::Duration) => &d.duration,
            (Self::Scheduling(d), TaskField::Location) => &d.location,
            (Self::Scheduling(d), TaskField::Description) => &d.description,
            (Self::Email(d), TaskField::Recipients) => &d.recipients,
            (Self::Email(d), TaskField::Subject) => &d.subject,
            (Self::Email(d), TaskField::Message) => &d.message,
            (Self::Compliance(d), TaskField::ReportType) => &d.report_type,
            (Self::Compliance(d), TaskField::Period) => &d.period,
            (Self::Compliance(d), TaskField::Description) => &d.description,
            (Self::Record(d), TaskField::RecordType) => &d.record_type,
            (Self::Record(d), TaskField::Student) => &d.student,
            (Self::Record(d), TaskField::Details) => &d.details,
            _ => return None,
        };
        value.as_deref()
    }

    /// Stores `value` verbatim into `field`.
    ///
    /// Description text is merged onto whatever is already there.
    pub fn set(&mut self, field: TaskField, value: &str) -> Result<()> {
        let kind = self.kind();
        let slot = self.slot(field).ok_or_else(|| {
            EduError::internal(format!("field '{}' does not belong to a {kind} task", field.key()))
        })?;

        *slot = match (field, slot.take()) {
            (TaskField::Description, Some(existing)) if !existing.is_empty() => {
                Some(format!("{existing}\n{value}"))
            }
            _ => Some(value.to_string()),
        };
        Ok(())
    }

    /// Collected values keyed by field name, in field order.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.kind()
            .fields()
            .iter()
            .filter_map(|field| {
                self.get(*field)
                    .map(|value| (field.key().to_string(), value.to_string()))
            })
            .collect()
    }

    /// Rebuilds typed data from a persisted open map. Unknown keys are ignored.
    pub fn from_map(kind: TaskKind, map: &BTreeMap<String, String>) -> Self {
        let mut data = Self::new(kind);
        for (key, value) in map {
            if let Some(slot) = TaskField::from_key(key).and_then(|field| data.slot(field)) {
                *slot = Some(value.clone());
            }
        }
        data
    }

    /// Human-readable summary shown before confirmation.
    pub fn summary(&self) -> String {
        self.kind()
            .fields()
            .iter()
            .filter_map(|field| {
                self.get(*field)
                    .map(|value| format!("- {}: {}", field.label(), value))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
