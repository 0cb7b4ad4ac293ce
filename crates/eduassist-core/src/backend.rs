//! Backend create-calls fired by the scripted assistant.
//!
//! A confirmed task becomes exactly one [`TaskSubmission`]; the
//! [`AssistantBackend`] trait decouples the flow from the HTTP client.

use crate::conversation::{TaskData, TaskField};
use crate::error::Result;
use crate::phrase;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload for `POST /api/v1/scheduling/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: NaiveDateTime,
    pub participants: Vec<String>,
    pub location: Option<String>,
    pub meeting_type: String,
}

impl MeetingRequest {
    /// Builds the meeting from collected answers.
    ///
    /// The date resolves against `today`; the duration comes from the
    /// duration answer, then the notes, then the 60 minute default. A
    /// duration that would run past the calendar's range also gets the
    /// default.
    pub fn from_task_data(data: &TaskData, today: NaiveDate) -> Self {
        let date = phrase::resolve_date(data.get(TaskField::Date).unwrap_or_default(), today);
        let time = phrase::parse_time(data.get(TaskField::Time).unwrap_or_default());
        let duration_minutes = match data.get(TaskField::Duration) {
            Some(text) => phrase::parse_duration(Some(text)),
            None => phrase::parse_duration(data.get(TaskField::Description)),
        };

        let start_datetime = date.and_time(time);
        let end_datetime = Duration::try_minutes(duration_minutes)
            .and_then(|duration| start_datetime.checked_add_signed(duration))
            .unwrap_or_else(|| {
                tracing::warn!(
                    "[Assistant] Duration of {} minutes out of range, using default",
                    duration_minutes
                );
                start_datetime
                    .checked_add_signed(Duration::minutes(phrase::DEFAULT_DURATION_MINUTES))
                    .unwrap_or(start_datetime)
            });
        Self {
            title: data
                .get(TaskField::Title)
                .unwrap_or("Meeting")
                .to_string(),
            description: data.get(TaskField::Description).map(str::to_string),
            start_datetime,
            end_datetime,
            participants: split_list(data.get(TaskField::Participants)),
            location: data.get(TaskField::Location).map(str::to_string),
            meeting_type: "meeting".to_string(),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_datetime - self.start_datetime).num_minutes()
    }
}

/// Payload for the assistant's send-email call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl EmailRequest {
    pub fn from_task_data(data: &TaskData) -> Self {
        Self {
            recipients: split_list(data.get(TaskField::Recipients)),
            subject: data.get(TaskField::Subject).unwrap_or_default().to_string(),
            body: data.get(TaskField::Message).unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRequest {
    pub report_type: String,
    pub period: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRequest {
    pub record_type: String,
    pub student: String,
    pub details: String,
}

/// The one backend call a confirmed task turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSubmission {
    Meeting(MeetingRequest),
    Email(EmailRequest),
    Compliance(ComplianceRequest),
    Record(RecordRequest),
}

impl TaskSubmission {
    pub fn from_task_data(data: &TaskData, today: NaiveDate) -> Self {
        let text = |field| data.get(field).unwrap_or_default().to_string();
        match data {
            TaskData::Scheduling(_) => Self::Meeting(MeetingRequest::from_task_data(data, today)),
            TaskData::Email(_) => Self::Email(EmailRequest::from_task_data(data)),
            TaskData::Compliance(_) => Self::Compliance(ComplianceRequest {
                report_type: text(TaskField::ReportType),
                period: text(TaskField::Period),
                notes: data.get(TaskField::Description).map(str::to_string),
            }),
            TaskData::Record(_) => Self::Record(RecordRequest {
                record_type: text(TaskField::RecordType),
                student: text(TaskField::Student),
                details: text(TaskField::Details),
            }),
        }
    }
}

/// Backend operations the scripted assistant can trigger.
///
/// Implementations return the backend's JSON response. Compliance and
/// record creation may be switched off; such implementations return
/// [`crate::EduError::FeatureDisabled`].
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    async fn create_meeting(&self, request: &MeetingRequest) -> Result<Value>;

    async fn send_email(&self, request: &EmailRequest) -> Result<Value>;

    async fn generate_compliance_report(&self, request: &ComplianceRequest) -> Result<Value>;

    async fn create_record(&self, request: &RecordRequest) -> Result<Value>;
}

/// Fires the backend call matching the submission.
pub async fn submit(backend: &dyn AssistantBackend, submission: &TaskSubmission) -> Result<Value> {
    match submission {
        TaskSubmission::Meeting(request) => backend.create_meeting(request).await,
        TaskSubmission::Email(request) => backend.send_email(request).await,
        TaskSubmission::Compliance(request) => backend.generate_compliance_report(request).await,
        TaskSubmission::Record(request) => backend.create_record(request).await,
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split([',', ';'])
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::TaskKind;
    use chrono::NaiveTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn scheduling(answers: &[(TaskField, &str)]) -> TaskData {
        let mut data = TaskData::new(TaskKind::Scheduling);
        for (field, value) in answers {
            data.set(*field, value).unwrap();
        }
        data
    }

    #[test]
    fn test_meeting_defaults() {
        let data = scheduling(&[(TaskField::Title, "Check-in"), (TaskField::Date, "soon")]);
        let meeting = MeetingRequest::from_task_data(&data, today());

        assert_eq!(meeting.start_datetime.date(), today());
        assert_eq!(
            meeting.start_datetime.time(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap()
        );
        assert_eq!(meeting.duration_minutes(), 60);
    }

    #[test]
    fn test_meeting_uses_parsed_values() {
        let data = scheduling(&[
            (TaskField::Title, "IEP review"),
            (TaskField::Participants, "a@school.org, b@school.org ,"),
            (TaskField::Date, "tomorrow"),
            (TaskField::Time, "2:00 PM"),
            (TaskField::Duration, "45 minutes"),
            (TaskField::Location, "Room 101"),
        ]);
        let meeting = MeetingRequest::from_task_data(&data, today());

        assert_eq!(
            meeting.start_datetime,
            NaiveDate::from_ymd_opt(2024, 5, 7)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap()
        );
        assert_eq!(meeting.end_datetime - meeting.start_datetime, Duration::minutes(45));
        assert_eq!(meeting.participants, vec!["a@school.org", "b@school.org"]);
        assert_eq!(meeting.location.as_deref(), Some("Room 101"));
    }

    #[test]
    fn test_out_of_range_duration_uses_default() {
        let data = scheduling(&[
            (TaskField::Date, "tomorrow"),
            (TaskField::Time, "2 pm"),
            (TaskField::Duration, "9999999999 hours"),
        ]);
        let meeting = MeetingRequest::from_task_data(&data, today());
        assert_eq!(meeting.duration_minutes(), 60);

        let data = scheduling(&[(TaskField::Duration, "200000000000000000 hours")]);
        let meeting = MeetingRequest::from_task_data(&data, today());
        assert_eq!(meeting.duration_minutes(), 60);
    }

    #[test]
    fn test_duration_falls_back_to_notes() {
        let data = scheduling(&[(TaskField::Description, "should take 2 hours")]);
        let meeting = MeetingRequest::from_task_data(&data, today());
        assert_eq!(meeting.duration_minutes(), 120);
    }

    #[test]
    fn test_meeting_serializes_naive_datetimes() {
        let data = scheduling(&[(TaskField::Time, "9 am")]);
        let meeting = MeetingRequest::from_task_data(&data, today());
        let json = serde_json::to_value(&meeting).unwrap();
        assert_eq!(json["start_datetime"], "2024-05-06T09:00:00");
        assert_eq!(json["end_datetime"], "2024-05-06T10:00:00");
    }
}
