//! HTTP-level errors and backend error-body parsing.

use eduassist_core::EduError;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// HTTP 401
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// HTTP 400/422 carrying a `detail` payload
    #[error("Validation failed: {}", .messages.join("; "))]
    Validation { status: u16, messages: Vec<String> },

    /// No response (DNS, refused connection, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Any other non-2xx response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// 2xx response whose body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classifies a non-2xx response from its status and raw body.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let mut messages = parse_error_detail(body);
        match status {
            StatusCode::UNAUTHORIZED => Self::Unauthorized {
                message: messages
                    .pop()
                    .unwrap_or_else(|| "Invalid credentials".to_string()),
            },
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY if !messages.is_empty() => {
                Self::Validation {
                    status: status.as_u16(),
                    messages,
                }
            }
            _ => Self::Server {
                status: status.as_u16(),
                message: if messages.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    messages.join("\n")
                },
            },
        }
    }

    /// Text shown to the user for this error.
    pub fn user_message(&self) -> String {
        EduError::from(self.clone()).user_message()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<ApiError> for EduError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { message } => EduError::Unauthorized(message),
            ApiError::Validation { messages, .. } => EduError::Validation(messages),
            ApiError::Network(message) => EduError::Network(message),
            ApiError::Server { status, message } => EduError::Server { status, message },
            ApiError::Decode(message) => EduError::Serialization {
                format: "JSON".to_string(),
                message,
            },
        }
    }
}

/// Extracts human-readable messages from a backend error body.
///
/// Understands `{"detail": "..."}`, `{"detail": [{"loc": [...], "msg": "..."}]}`
/// and `{"message": "..."}`. Non-JSON bodies are returned as-is.
pub fn parse_error_detail(body: &str) -> Vec<String> {
    let body = body.trim();
    if body.is_empty() {
        return Vec::new();
    }

    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return vec![body.to_string()];
    };

    match json.get("detail").or_else(|| json.get("message")).or_else(|| json.get("error")) {
        Some(Value::String(message)) => vec![message.clone()],
        Some(Value::Array(items)) => items.iter().filter_map(field_message).collect(),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(|m| vec![m.to_string()])
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn field_message(item: &Value) -> Option<String> {
    if let Some(text) = item.as_str() {
        return Some(text.to_string());
    }
    let msg = item.get("msg").and_then(Value::as_str)?;
    // the last `loc` entry is the field name; "body"/"query" prefixes are noise
    let field = item
        .get("loc")
        .and_then(Value::as_array)
        .and_then(|loc| loc.last())
        .and_then(|last| match last {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
    Some(match field {
        Some(field) => format!("{field}: {msg}"),
        None => msg.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_detail() {
        assert_eq!(
            parse_error_detail(r#"{"detail": "Email already registered"}"#),
            vec!["Email already registered"]
        );
    }

    #[test]
    fn test_field_level_detail() {
        let body = r#"{"detail": [
            {"loc": ["body", "email"], "msg": "field required", "type": "value_error.missing"},
            {"loc": ["body", "password"], "msg": "ensure this value has at least 8 characters"}
        ]}"#;
        assert_eq!(
            parse_error_detail(body),
            vec![
                "email: field required",
                "password: ensure this value has at least 8 characters"
            ]
        );
    }

    #[test]
    fn test_plain_text_and_empty_bodies() {
        assert_eq!(parse_error_detail("Bad Gateway"), vec!["Bad Gateway"]);
        assert!(parse_error_detail("   ").is_empty());
        assert!(parse_error_detail(r#"{"status": "error"}"#).is_empty());
    }

    #[test]
    fn test_classification() {
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, r#"{"detail":"Incorrect email or password"}"#);
        assert_eq!(
            err,
            ApiError::Unauthorized {
                message: "Incorrect email or password".into()
            }
        );

        let err = ApiError::from_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","title"],"msg":"field required"}]}"#,
        );
        assert!(matches!(err, ApiError::Validation { status: 422, .. }));

        let err = ApiError::from_response(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(
            err,
            ApiError::Server {
                status: 500,
                message: "Internal Server Error".into()
            }
        );
    }

    #[test]
    fn test_network_error_message() {
        assert_eq!(
            ApiError::Network("connection refused".into()).user_message(),
            "Network error"
        );
    }
}
