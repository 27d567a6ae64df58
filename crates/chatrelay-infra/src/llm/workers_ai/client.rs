//! WorkersAiBackend -- concrete [`InferenceBackend`] for Cloudflare Workers AI.
//!
//! Sends `POST {base_url}/accounts/{account_id}/ai/run/{model}` with a bearer
//! token. The API token is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use secrecy::{ExposeSecret, SecretString};

use chatrelay_core::llm::backend::InferenceBackend;
use chatrelay_types::llm::{BackendResponse, InferenceRequest, LlmError};

use super::types::RunEnvelope;

/// Cloudflare v4 API root.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Workers AI text-generation backend.
///
/// Does not derive Debug so the token cannot leak through formatting.
pub struct WorkersAiBackend {
    client: reqwest::Client,
    api_token: SecretString,
    account_id: String,
    base_url: String,
}

impl WorkersAiBackend {
    /// Create a backend for `account_id` using the public Cloudflare API.
    pub fn new(api_token: SecretString, account_id: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_token,
            account_id,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (proxies, AI Gateway, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn run_url(&self, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url, self.account_id, model
        )
    }
}

/// Resolve a parsed body into a response shape.
///
/// Prefers the envelope's `result`; bodies without one are classified as-is.
fn resolve_body(body: serde_json::Value) -> Result<BackendResponse, LlmError> {
    let envelope: RunEnvelope = match serde_json::from_value(body.clone()) {
        Ok(envelope) => envelope,
        Err(_) => return Ok(BackendResponse::from_value(&body)),
    };

    if envelope.success == Some(false) {
        return Err(LlmError::Provider {
            message: envelope.error_summary(),
        });
    }

    match envelope.result {
        Some(result) if !result.is_null() => Ok(BackendResponse::from_value(&result)),
        _ => Ok(BackendResponse::from_value(&body)),
    }
}

fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

impl InferenceBackend for WorkersAiBackend {
    fn name(&self) -> &str {
        "workers_ai"
    }

    async fn run(&self, request: &InferenceRequest) -> Result<BackendResponse, LlmError> {
        let url = self.run_url(&request.model);
        tracing::debug!(model = %request.model, messages = request.messages.len(), "workers ai run");

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_token.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited {
                    retry_after_ms: retry_after,
                },
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let text = response.text().await.map_err(|e| LlmError::Provider {
            message: format!("failed to read response body: {e}"),
        })?;
        let body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        resolve_body(body)
    }
}
