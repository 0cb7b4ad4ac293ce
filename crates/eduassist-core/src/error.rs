//! Error types for the EduAssist client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the EduAssist client core.
///
/// Backend failures are folded into the same taxonomy the dashboard shows
/// to the user: authentication, validation, transport, and server errors.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EduError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session store error
    #[error("Storage error: {0}")]
    Storage(String),

    /// The backend rejected the credentials (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Field-level or business validation messages from the backend `detail`
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Transport failure before a response was received
    #[error("Network error: {0}")]
    Network(String),

    /// Any other non-2xx response
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The backend feature exists in the flow but is switched off
    #[error("{0}")]
    FeatureDisabled(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EduError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an authentication failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if this is a transport failure
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if the backend reported the feature as disabled
    pub fn is_feature_disabled(&self) -> bool {
        matches!(self, Self::FeatureDisabled(_))
    }

    /// The text a notification or chat bubble should show for this error.
    ///
    /// Server-provided messages are surfaced verbatim; transport failures
    /// collapse to a generic "Network error".
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized(message) => message.clone(),
            Self::Validation(messages) => messages.join("\n"),
            Self::Network(_) => "Network error".to_string(),
            Self::Server { message, .. } => message.clone(),
            Self::FeatureDisabled(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for EduError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for EduError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for EduError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for EduError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at bootstrap edges)
impl From<anyhow::Error> for EduError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, EduError>`.
pub type Result<T> = std::result::Result<T, EduError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_collapses_to_generic_message() {
        let err = EduError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), "Network error");
        assert!(err.is_network());
    }

    #[test]
    fn test_validation_messages_are_surfaced_verbatim() {
        let err = EduError::Validation(vec![
            "email: field required".to_string(),
            "password: too short".to_string(),
        ]);
        assert_eq!(
            err.user_message(),
            "email: field required\npassword: too short"
        );
    }

    #[test]
    fn test_server_error_uses_server_message() {
        let err = EduError::Server {
            status: 500,
            message: "Calendar service unavailable".to_string(),
        };
        assert_eq!(err.user_message(), "Calendar service unavailable");
        assert_eq!(
            err.to_string(),
            "Server error (500): Calendar service unavailable"
        );
    }
}
