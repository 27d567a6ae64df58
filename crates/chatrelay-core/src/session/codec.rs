//! History codec: conversation <-> stored string.
//!
//! The stored form is a JSON array of `{role, content}` records. Decoding is
//! strict (closed role set, string content, no extra fields); the caller
//! decides how to recover from a [`DecodeError`].

use chatrelay_types::chat::Conversation;
use chatrelay_types::error::{DecodeError, EncodeError};

/// Decode a stored value into a conversation.
///
/// - `None` (nothing stored) yields `[system(system_prompt)]`.
/// - An empty array is treated the same as nothing stored.
/// - Anything that is not an array of valid messages is a [`DecodeError`].
pub fn decode(raw: Option<&str>, system_prompt: &str) -> Result<Conversation, DecodeError> {
    let Some(raw) = raw else {
        return Ok(Conversation::with_system_prompt(system_prompt));
    };

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::Syntax(e.to_string()))?;
    let conversation: Conversation =
        serde_json::from_value(value).map_err(|e| DecodeError::Shape(e.to_string()))?;

    if conversation.is_empty() {
        return Ok(Conversation::with_system_prompt(system_prompt));
    }

    Ok(conversation)
}

/// Encode a conversation for storage.
pub fn encode(conversation: &Conversation) -> Result<String, EncodeError> {
    serde_json::to_string(conversation).map_err(|e| EncodeError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatrelay_types::chat::{Message, MessageRole};

    const PROMPT: &str = "You are a test persona.";

    #[test]
    fn decode_absent_yields_system_only() {
        let conv = decode(None, PROMPT).unwrap();
        assert_eq!(conv.len(), 1);
        assert_eq!(conv.messages()[0], Message::system(PROMPT));
    }

    #[test]
    fn decode_empty_array_yields_system_only() {
        let conv = decode(Some("[]"), PROMPT).unwrap();
        assert_eq!(conv, Conversation::with_system_prompt(PROMPT));
    }

    #[test]
    fn decode_valid_history_preserves_order() {
        let raw = r#"[
            {"role":"system","content":"sys"},
            {"role":"user","content":"hi"},
            {"role":"assistant","content":"hello"}
        ]"#;
        let conv = decode(Some(raw), PROMPT).unwrap();
        let roles: Vec<MessageRole> = conv.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::System, MessageRole::User, MessageRole::Assistant]
        );
        assert_eq!(conv.messages()[2].content, "hello");
    }

    #[test]
    fn decode_does_not_inject_system_into_existing_history() {
        let raw = r#"[{"role":"user","content":"hi"},{"role":"assistant","content":"yo"}]"#;
        let conv = decode(Some(raw), PROMPT).unwrap();
        assert_eq!(conv.len(), 2);
        assert!(!conv.starts_with_system());
    }

    #[test]
    fn decode_invalid_json_is_syntax_error() {
        for raw in ["{not json", "[{\"role\":\"user\"", "", "[1,]"] {
            let err = decode(Some(raw), PROMPT).unwrap_err();
            assert!(matches!(err, DecodeError::Syntax(_)), "{raw} gave {err:?}");
        }
    }

    #[test]
    fn decode_wrong_shapes_are_shape_errors() {
        for raw in [
            r#"{"role":"user","content":"hi"}"#,
            r#"["hi"]"#,
            r#"[{"role":"tool","content":"x"}]"#,
            r#"[{"role":"user","content":42}]"#,
            r#"[{"role":"user"}]"#,
            r#"[{"role":"user","content":"x","extra":true}]"#,
            r#"null"#,
        ] {
            let err = decode(Some(raw), PROMPT).unwrap_err();
            assert!(matches!(err, DecodeError::Shape(_)), "{raw} gave {err:?}");
        }
    }

    #[test]
    fn encode_decode_roundtrip_preserves_unicode() {
        let conv = Conversation::from_messages(vec![
            Message::system("persona"),
            Message::user("héllo wörld — 你好 🦀"),
            Message::assistant("line1\nline2\t\"quoted\"\u{0000}"),
        ]);
        let encoded = encode(&conv).unwrap();
        let decoded = decode(Some(&encoded), PROMPT).unwrap();
        assert_eq!(decoded, conv);
    }

    #[test]
    fn encode_is_deterministic() {
        let conv = Conversation::from_messages(vec![Message::user("a"), Message::assistant("b")]);
        assert_eq!(encode(&conv).unwrap(), encode(&conv.clone()).unwrap());
        assert_eq!(
            encode(&conv).unwrap(),
            r#"[{"role":"user","content":"a"},{"role":"assistant","content":"b"}]"#
        );
    }
}
