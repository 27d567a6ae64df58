//! Conversation and session key types for the chat relay.
//!
//! A conversation is the ordered message list persisted per session. The
//! session key is the store lookup key derived from the caller's identifier.

use serde::{Deserialize, Serialize};

use std::fmt;

// Re-export the message types (they're used in both chat and llm contexts).
pub use crate::llm::{Message, MessageRole};

/// Ordered sequence of messages; insertion order is dialogue order.
///
/// Serializes transparently as a JSON array of `{role, content}` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// A fresh conversation holding only the persona system message.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(prompt)],
        }
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The last message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether the conversation opens with a system message.
    pub fn starts_with_system(&self) -> bool {
        self.messages
            .first()
            .is_some_and(|m| m.role == MessageRole::System)
    }
}

/// Store lookup key for a session.
///
/// Built as `prefix + id`. Prefixing is injective, so distinct non-empty
/// identifiers never share a key. A missing or empty identifier maps to the
/// anonymous id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn derive(prefix: &str, anonymous_id: &str, session_id: Option<&str>) -> Self {
        let id = match session_id {
            Some(id) if !id.is_empty() => id,
            _ => anonymous_id,
        };
        Self(format!("{prefix}{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_serializes_as_array() {
        let mut conv = Conversation::with_system_prompt("be nice");
        conv.push(Message::user("hi"));
        let json = serde_json::to_string(&conv).unwrap();
        assert_eq!(
            json,
            r#"[{"role":"system","content":"be nice"},{"role":"user","content":"hi"}]"#
        );
    }

    #[test]
    fn test_conversation_starts_with_system() {
        assert!(Conversation::with_system_prompt("p").starts_with_system());
        assert!(!Conversation::from_messages(vec![Message::user("u")]).starts_with_system());
        assert!(!Conversation::default().starts_with_system());
    }

    #[test]
    fn test_session_key_prefixes_identifier() {
        let key = SessionKey::derive("sess:", "anon", Some("s1"));
        assert_eq!(key.as_str(), "sess:s1");
        assert_eq!(key.to_string(), "sess:s1");
    }

    #[test]
    fn test_session_key_missing_or_empty_is_anonymous() {
        let missing = SessionKey::derive("sess:", "anon", None);
        let empty = SessionKey::derive("sess:", "anon", Some(""));
        assert_eq!(missing.as_str(), "sess:anon");
        assert_eq!(missing, empty);
    }

    #[test]
    fn test_session_key_distinct_ids_stay_distinct() {
        let ids = ["a", "A", "a ", "sess:a", "über", "1", "01"];
        let keys: std::collections::HashSet<_> = ids
            .iter()
            .map(|id| SessionKey::derive("sess:", "anon", Some(id)))
            .collect();
        assert_eq!(keys.len(), ids.len());
    }
}
