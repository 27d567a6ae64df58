//! Infrastructure layer for the chat relay.
//!
//! Contains implementations of the port traits defined in `chatrelay-core`:
//! SQLite and in-memory session stores, the Workers AI and OpenAI-compatible
//! inference backends, and the configuration loader.

pub mod config;
pub mod llm;
pub mod memory;
pub mod sqlite;
