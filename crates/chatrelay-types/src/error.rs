use thiserror::Error;

use crate::llm::LlmError;

/// Errors from session store operations (used by trait definitions in chatrelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),
}

/// Stored history could not be turned back into a conversation.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stored history is not valid JSON: {0}")]
    Syntax(String),

    #[error("stored history has the wrong shape: {0}")]
    Shape(String),
}

/// A conversation could not be serialized for storage.
#[derive(Debug, Error)]
#[error("failed to encode history: {0}")]
pub struct EncodeError(pub String);

/// A chat turn failed and nothing was persisted for it.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("inference backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("session store failed: {0}")]
    Store(#[from] RepositoryError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Configuration values that fail validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("missing environment variable '{0}'")]
    MissingEnv(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_turn_error_from_llm_error() {
        let err: TurnError = LlmError::AuthenticationFailed.into();
        assert!(matches!(err, TurnError::Backend(_)));
        assert_eq!(err.to_string(), "inference backend failed: authentication failed");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Invalid {
            field: "session.window_size",
            reason: "must be at least 1".to_string(),
        };
        assert!(err.to_string().contains("session.window_size"));
    }
}
