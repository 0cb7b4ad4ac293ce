//! Live performance events pushed over the performance WebSocket.

use crate::error::{EduError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Delay before reopening a dropped performance stream.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// A push update, discriminated by its `type` field.
///
/// Payload fields besides `type` are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PerformanceEvent {
    PerformanceUpdate {
        #[serde(flatten)]
        data: Map<String, Value>,
    },
    GradeUpdate {
        #[serde(flatten)]
        data: Map<String, Value>,
    },
    AttendanceUpdate {
        #[serde(flatten)]
        data: Map<String, Value>,
    },
    ExamCreated {
        #[serde(flatten)]
        data: Map<String, Value>,
    },
}

impl PerformanceEvent {
    /// Decodes one text frame.
    pub fn decode(frame: &str) -> Result<Self> {
        serde_json::from_str(frame).map_err(|e| EduError::Serialization {
            format: "performance event".to_string(),
            message: e.to_string(),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PerformanceUpdate { .. } => "performance_update",
            Self::GradeUpdate { .. } => "grade_update",
            Self::AttendanceUpdate { .. } => "attendance_update",
            Self::ExamCreated { .. } => "exam_created",
        }
    }

    pub fn data(&self) -> &Map<String, Value> {
        match self {
            Self::PerformanceUpdate { data }
            | Self::GradeUpdate { data }
            | Self::AttendanceUpdate { data }
            | Self::ExamCreated { data } => data,
        }
    }
}

/// WebSocket path for an educator's performance stream.
pub fn performance_ws_path(educator_id: &str) -> String {
    format!("/ws/performance/{educator_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_grade_update_keeps_payload() {
        let event =
            PerformanceEvent::decode(r#"{"type":"grade_update","student_id":12,"grade":"A-"}"#)
                .unwrap();
        assert_eq!(event.kind(), "grade_update");
        assert_eq!(event.data()["student_id"], 12);
        assert_eq!(event.data()["grade"], "A-");
    }

    #[test]
    fn test_decode_exam_created() {
        let event = PerformanceEvent::decode(r#"{"type":"exam_created","exam":{"id":3}}"#).unwrap();
        assert!(matches!(event, PerformanceEvent::ExamCreated { .. }));
    }

    #[test]
    fn test_unknown_type_is_an_error() {
        let err = PerformanceEvent::decode(r#"{"type":"heartbeat"}"#).unwrap_err();
        assert!(matches!(err, EduError::Serialization { .. }));
    }

    #[test]
    fn test_ws_path() {
        assert_eq!(performance_ws_path("17"), "/ws/performance/17");
    }
}
