//! Error types for the core library

use thiserror::Error;

/// Fallback message used when a failed request carries no message of its own.
pub const FALLBACK_LABELS_ERROR: &str = "Error fetching labels";

/// The single failure kind of the labels request.
///
/// `Display` is the bare human-readable message so it can be stored in
/// [`LabelState::Failed`](crate::state::LabelState::Failed) as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RequestError {
    message: String,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self {
                message: FALLBACK_LABELS_ERROR.to_string(),
            };
        }
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_displays_bare_message() {
        let err = RequestError::new("Internal Server Error");
        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(err.message(), "Internal Server Error");
    }

    #[test]
    fn test_request_error_empty_message_uses_fallback() {
        assert_eq!(RequestError::new("").message(), FALLBACK_LABELS_ERROR);
        assert_eq!(RequestError::new("   ").message(), FALLBACK_LABELS_ERROR);
    }
}
