//! Error types for the external AI service client.

use yazim_core::error::YazimError;
use yazim_core::types::AssistantOperation;

/// Errors from talking to the AI service.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("service returned no text")]
    EmptyResponse,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl AssistantError {
    /// Attach the operation that failed, producing the workspace error.
    pub fn during(self, operation: AssistantOperation) -> YazimError {
        YazimError::Assistant {
            operation,
            message: self.to_string(),
        }
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        AssistantError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        AssistantError::InvalidResponse(err.to_string())
    }
}
