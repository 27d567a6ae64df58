//! Inference backend abstractions for the chat relay.
//!
//! - `InferenceBackend`: RPITIT trait for concrete backend implementations
//! - `BoxInferenceBackend`: Object-safe wrapper for dynamic dispatch

pub mod backend;
pub mod box_backend;
