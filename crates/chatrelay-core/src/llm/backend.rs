//! InferenceBackend trait definition.
//!
//! This is the core abstraction that all inference backends implement.
//! Uses RPITIT for `run`; `BoxInferenceBackend` adds dynamic dispatch.

use chatrelay_types::llm::{BackendResponse, InferenceRequest, LlmError};

/// Trait for text-generation backends (Workers AI, OpenAI-compatible, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). A backend
/// classifies its raw reply into a [`BackendResponse`] before returning, so
/// shape sniffing never leaks past this boundary.
///
/// Implementations live in chatrelay-infra (e.g., `WorkersAiBackend`).
pub trait InferenceBackend: Send + Sync {
    /// Human-readable backend name (e.g., "workers_ai").
    fn name(&self) -> &str;

    /// Run a non-streaming generation over the full message list.
    fn run(
        &self,
        request: &InferenceRequest,
    ) -> impl std::future::Future<Output = Result<BackendResponse, LlmError>> + Send;
}
