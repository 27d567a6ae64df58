//! Conversation history handling: codec, window bounds and the turn pipeline.

pub mod bounds;
pub mod codec;
pub mod manager;
