//! Observability setup for the chat relay: structured logging via `tracing`
//! with optional OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, shutdown_tracing, LogFormat};
