//! Workers AI REST API types.
//!
//! The request body is the provider-agnostic
//! [`InferenceRequest`](chatrelay_types::llm::InferenceRequest), which already
//! serializes to the `run` body. Only the response envelope lives here.

use serde::Deserialize;

/// Response envelope returned by the Cloudflare v4 API.
///
/// `success` and `errors` are absent on some gateways that return the model
/// output directly; callers fall back to classifying the whole body.
#[derive(Debug, Clone, Deserialize)]
pub struct RunEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

/// One entry of the envelope's `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
}

impl RunEnvelope {
    /// Joined error messages, e.g. `"7003: No route for that URI"`.
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "request was not successful".to_string();
        }
        self.errors
            .iter()
            .map(|e| match e.code {
                Some(code) => format!("{code}: {}", e.message),
                None => e.message.clone(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
