use thiserror::Error;

use crate::types::{AssistantOperation, SessionStatus};

/// Top-level error type for the Yazım Doktoru workspace.
///
/// Subsystem crates define their own error types and implement
/// `From<SubsystemError> for YazimError` so that `?` works across crate
/// boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum YazimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid session transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("Assistant error during {operation}: {message}")]
    Assistant {
        operation: AssistantOperation,
        message: String,
    },

    #[error("Speech recognition is not supported in this environment")]
    SpeechUnavailable,

    #[error("Dictation error: {0}")]
    Dictation(String),

    #[error("{0} is already in progress")]
    InProgress(AssistantOperation),
}

impl YazimError {
    /// Localized message suitable for showing to the user.
    ///
    /// Assistant failures map to the per-operation Turkish message; every
    /// other variant falls back to its display string.
    pub fn user_message(&self) -> String {
        match self {
            YazimError::Assistant { operation, .. } => operation.failure_message().to_string(),
            YazimError::SpeechUnavailable => {
                "Tarayıcınız ya da ortamınız konuşma tanımayı desteklemiyor.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<toml::de::Error> for YazimError {
    fn from(err: toml::de::Error) -> Self {
        YazimError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for YazimError {
    fn from(err: toml::ser::Error) -> Self {
        YazimError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for YazimError {
    fn from(err: serde_json::Error) -> Self {
        YazimError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Yazım Doktoru operations.
pub type Result<T> = std::result::Result<T, YazimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = YazimError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: YazimError = io_err.into();
        assert!(matches!(err, YazimError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = YazimError::InvalidTransition {
            from: SessionStatus::Waiting,
            to: SessionStatus::Finished,
        };
        assert_eq!(
            err.to_string(),
            "Invalid session transition: waiting -> finished"
        );
    }

    #[test]
    fn test_assistant_error_user_message_is_localized() {
        let err = YazimError::Assistant {
            operation: AssistantOperation::Translation,
            message: "HTTP 503".to_string(),
        };
        assert_eq!(err.user_message(), "Metin çevrilirken bir hata oluştu.");
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[test]
    fn test_in_progress_display() {
        let err = YazimError::InProgress(AssistantOperation::GrammarCheck);
        assert_eq!(err.to_string(), "grammar check is already in progress");
    }

    #[test]
    fn test_error_from_toml_de() {
        let err: std::result::Result<toml::Value, _> = toml::from_str("invalid = [[[");
        let converted: YazimError = err.unwrap_err().into();
        assert!(matches!(converted, YazimError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ nope }");
        let converted: YazimError = err.unwrap_err().into();
        assert!(matches!(converted, YazimError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let value = io_result?;
            Ok(value.to_string())
        }

        assert_eq!(inner().unwrap(), "42");
    }
}
