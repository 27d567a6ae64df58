//! BoxInferenceBackend -- object-safe dynamic dispatch wrapper for InferenceBackend.
//!
//! 1. Define an object-safe `InferenceBackendDyn` trait with boxed futures
//! 2. Blanket-impl `InferenceBackendDyn` for all `T: InferenceBackend`
//! 3. `BoxInferenceBackend` wraps `Box<dyn InferenceBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use chatrelay_types::llm::{BackendResponse, InferenceRequest, LlmError};

use super::backend::InferenceBackend;

/// Object-safe version of [`InferenceBackend`] with boxed futures.
pub trait InferenceBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn run_boxed<'a>(
        &'a self,
        request: &'a InferenceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BackendResponse, LlmError>> + Send + 'a>>;
}

impl<T: InferenceBackend> InferenceBackendDyn for T {
    fn name(&self) -> &str {
        InferenceBackend::name(self)
    }

    fn run_boxed<'a>(
        &'a self,
        request: &'a InferenceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BackendResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.run(request))
    }
}

/// Type-erased inference backend for runtime backend selection.
///
/// Since `InferenceBackend` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxInferenceBackend` stores the `InferenceBackendDyn` object and
/// implements `InferenceBackend` itself, so it slots into any generic consumer.
pub struct BoxInferenceBackend {
    inner: Box<dyn InferenceBackendDyn + Send + Sync>,
}

impl BoxInferenceBackend {
    /// Wrap a concrete `InferenceBackend` in a type-erased box.
    pub fn new<T: InferenceBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }
}

impl InferenceBackend for BoxInferenceBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn run(&self, request: &InferenceRequest) -> Result<BackendResponse, LlmError> {
        self.inner.run_boxed(request).await
    }
}
