//! Session store abstractions for the chat relay.
//!
//! Defines the durable key-value port with per-key expiry.
//! Implementations live in chatrelay-infra.

pub mod box_store;
pub mod session_store;
