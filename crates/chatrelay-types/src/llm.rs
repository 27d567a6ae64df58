//! LLM request/response types for the chat relay.
//!
//! These types model the data shapes for inference backend interactions:
//! role-tagged messages, the non-streaming inference request, the closed set
//! of response shapes a backend may return, and error handling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in an LLM conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in an LLM conversation.
///
/// Unknown fields are rejected so that a stored record which is not exactly
/// `{role, content}` counts as corrupt history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Non-streaming request sent to an inference backend.
///
/// Serializes to the Workers AI `run` body:
/// `{ "messages": [...], "stream": false, "max_tokens": N, "temperature": T }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Model identifier. Not part of the body; backends put it in the URL.
    #[serde(skip)]
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub stream: bool,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// The shapes a backend reply can take, resolved once at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendResponse {
    /// `{ "response": "..." }`
    Text(String),
    /// `{ "messages": [{ "content": "..." }, ...] }`, concatenated in order.
    Fragments(Vec<String>),
    /// Anything else. Degrades to the placeholder reply.
    Unrecognized,
}

impl BackendResponse {
    /// Classify a raw backend result object.
    ///
    /// A string `response` field wins over a `messages` array. Fragments
    /// without a string `content` contribute an empty string.
    pub fn from_value(value: &serde_json::Value) -> Self {
        if let Some(text) = value.get("response").and_then(|v| v.as_str()) {
            return BackendResponse::Text(text.to_string());
        }

        if let Some(items) = value.get("messages").and_then(|v| v.as_array()) {
            let fragments = items
                .iter()
                .map(|m| {
                    m.get("content")
                        .and_then(|c| c.as_str())
                        .unwrap_or_default()
                        .to_string()
                })
                .collect();
            return BackendResponse::Fragments(fragments);
        }

        BackendResponse::Unrecognized
    }

    /// Whether the backend returned a shape we understand.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, BackendResponse::Unrecognized)
    }

    /// Collapse the response into reply text, using `placeholder` for
    /// unrecognized shapes.
    pub fn into_reply(self, placeholder: &str) -> String {
        match self {
            BackendResponse::Text(text) => text,
            BackendResponse::Fragments(parts) => parts.concat(),
            BackendResponse::Unrecognized => placeholder.to_string(),
        }
    }
}

/// Errors from inference backend operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("backend timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Type of inference backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    WorkersAi,
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::WorkersAi => write!(f, "workers_ai"),
            BackendKind::OpenAiCompatible => write!(f, "openai_compatible"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "workers_ai" => Ok(BackendKind::WorkersAi),
            "openai_compatible" => Ok(BackendKind::OpenAiCompatible),
            other => Err(format!("invalid backend kind: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_message_rejects_unknown_role() {
        let result: Result<Message, _> =
            serde_json::from_str(r#"{"role":"tool","content":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_inference_request_body_omits_model() {
        let request = InferenceRequest {
            model: "@cf/mistral/mistral-7b-instruct-v0.1".to_string(),
            messages: vec![Message::user("hi")],
            stream: false,
            max_tokens: 400,
            temperature: 0.7,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("model").is_none());
        assert_eq!(body["stream"], json!(false));
        assert_eq!(body["max_tokens"], json!(400));
        assert_eq!(body["messages"][0], json!({"role": "user", "content": "hi"}));
    }

    #[test]
    fn test_backend_response_text() {
        let resp = BackendResponse::from_value(&json!({"response": "hello"}));
        assert_eq!(resp, BackendResponse::Text("hello".to_string()));
        assert_eq!(resp.into_reply("(no response)"), "hello");
    }

    #[test]
    fn test_backend_response_fragments_concatenate_in_order() {
        let resp = BackendResponse::from_value(&json!({
            "messages": [{"content": "Hel"}, {"content": "lo"}, {"role": "x"}, {"content": "!"}]
        }));
        assert_eq!(
            resp,
            BackendResponse::Fragments(vec![
                "Hel".to_string(),
                "lo".to_string(),
                String::new(),
                "!".to_string()
            ])
        );
        assert_eq!(resp.into_reply("(no response)"), "Hello!");
    }

    #[test]
    fn test_backend_response_text_wins_over_messages() {
        let resp = BackendResponse::from_value(&json!({
            "response": "text",
            "messages": [{"content": "frag"}]
        }));
        assert_eq!(resp, BackendResponse::Text("text".to_string()));
    }

    #[test]
    fn test_backend_response_unrecognized() {
        for value in [
            json!({}),
            json!({"response": 42}),
            json!({"messages": "not an array"}),
            json!(null),
            json!("bare string"),
        ] {
            let resp = BackendResponse::from_value(&value);
            assert!(!resp.is_recognized(), "{value} should be unrecognized");
            assert_eq!(resp.into_reply("(no response)"), "(no response)");
        }
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Timeout { secs: 30 };
        assert_eq!(err.to_string(), "backend timed out after 30s");
    }

    #[test]
    fn test_backend_kind_serde() {
        let kind = BackendKind::OpenAiCompatible;
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"openai_compatible\"");
        let parsed: BackendKind = serde_json::from_str("\"workers_ai\"").unwrap();
        assert_eq!(parsed, BackendKind::WorkersAi);
        assert_eq!("workers_ai".parse::<BackendKind>().unwrap(), BackendKind::WorkersAi);
    }
}
