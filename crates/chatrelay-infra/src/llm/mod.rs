//! Inference backend implementations.
//!
//! Contains concrete implementations of the
//! [`InferenceBackend`](chatrelay_core::llm::backend::InferenceBackend) trait
//! and a factory ([`create_backend`]) that builds the configured one.

pub mod openai_compat;
pub mod workers_ai;

use secrecy::SecretString;

use chatrelay_core::llm::box_backend::BoxInferenceBackend;
use chatrelay_types::config::BackendConfig;
use chatrelay_types::llm::{BackendKind, LlmError};

use self::openai_compat::OpenAiCompatibleBackend;
use self::workers_ai::WorkersAiBackend;

/// Create a [`BoxInferenceBackend`] from a [`BackendConfig`].
///
/// # Errors
///
/// Workers AI requires both an API token and an account id.
pub fn create_backend(
    config: &BackendConfig,
    api_key: Option<SecretString>,
) -> Result<BoxInferenceBackend, LlmError> {
    match config.kind {
        BackendKind::WorkersAi => {
            let token = api_key.ok_or(LlmError::AuthenticationFailed)?;
            let account_id = config
                .account_id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| {
                    LlmError::InvalidRequest("backend.account_id is required for workers_ai".to_string())
                })?;

            let mut backend = WorkersAiBackend::new(token, account_id)?;
            if let Some(base_url) = config.base_url.as_deref() {
                backend = backend.with_base_url(base_url);
            }
            Ok(BoxInferenceBackend::new(backend))
        }
        BackendKind::OpenAiCompatible => {
            let base_url = config
                .base_url
                .as_deref()
                .unwrap_or(openai_compat::DEFAULT_BASE_URL);
            let backend = OpenAiCompatibleBackend::new(base_url, api_key.as_ref());
            Ok(BoxInferenceBackend::new(backend))
        }
    }
}
