//! Size bounds applied to each turn: input truncation and the history window.

use chatrelay_types::chat::{Conversation, MessageRole};
use chatrelay_types::config::TrimPolicy;

/// Truncate `input` to at most `max_chars` characters (Unicode scalar values).
pub fn truncate_message(input: &str, max_chars: usize) -> &str {
    match input.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &input[..byte_idx],
        None => input,
    }
}

/// Keep the most recent `window_size` messages.
///
/// Length is counted as raw list length, not turns. With [`TrimPolicy::Raw`]
/// the opening system message is dropped like any other entry once it falls
/// outside the window. With [`TrimPolicy::PreserveSystem`] a leading system
/// message is kept and the remaining `window_size - 1` slots take the most
/// recent entries.
pub fn trim_history(conversation: Conversation, window_size: usize, policy: TrimPolicy) -> Conversation {
    if conversation.len() <= window_size {
        return conversation;
    }

    let mut messages = conversation.into_messages();
    let keep_system = policy == TrimPolicy::PreserveSystem
        && window_size >= 1
        && messages.first().is_some_and(|m| m.role == MessageRole::System);

    if keep_system {
        let tail = messages.split_off(messages.len() - (window_size - 1));
        messages.truncate(1);
        messages.extend(tail);
        return Conversation::from_messages(messages);
    }

    let start = messages.len() - window_size;
    Conversation::from_messages(messages.split_off(start))
}
