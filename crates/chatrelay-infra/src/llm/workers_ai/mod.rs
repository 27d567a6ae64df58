//! Cloudflare Workers AI inference backend.
//!
//! Calls the Workers AI REST `run` endpoint for a text-generation model and
//! resolves the reply into a [`BackendResponse`](chatrelay_types::llm::BackendResponse).

pub mod client;
pub mod types;

pub use client::WorkersAiBackend;
