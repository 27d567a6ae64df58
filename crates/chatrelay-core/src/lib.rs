//! Business logic and port trait definitions for the chat relay.
//!
//! This crate defines the "ports" (store and backend traits) that the
//! infrastructure layer implements, plus the session turn pipeline. It
//! depends only on `chatrelay-types` -- never on `chatrelay-infra` or any
//! database/IO crate.

pub mod llm;
pub mod session;
pub mod store;
