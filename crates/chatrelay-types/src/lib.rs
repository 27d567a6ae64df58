//! Shared domain types for the chat relay.
//!
//! This crate contains the core domain types used across the relay:
//! messages, conversations, session keys, configuration, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
