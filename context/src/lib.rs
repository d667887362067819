//! # context
//!
//! Turns stored conversation history into a provider-ready message list
//! and keeps it inside the model's context window. Token counts are the
//! usual rough estimate of four characters per token; exact budgeting
//! belongs to the provider, this only prevents obviously oversized
//! requests.

use prompt::ChatMessage;
use tutor_core::{Message, MessageRole};

/// Conservative window for the chat model, leaving headroom for the
/// response.
pub const MAX_CONTEXT_WINDOW_TOKENS: usize = 4096;

const CHARS_PER_TOKEN: usize = 4;

/// Approximate token count for a piece of text.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(CHARS_PER_TOKEN)
}

/// Approximate token count across a message list.
pub fn estimate_total(messages: &[ChatMessage]) -> usize {
    messages.iter().map(|m| estimate_tokens(&m.content)).sum()
}

/// Builds the provider message list: system prompt first, then the
/// stored history (student maps to user, tutor to assistant), then the
/// incoming student message.
pub fn to_chat_messages(
    history: &[Message],
    current_message: &str,
    system_prompt: &str,
) -> Vec<ChatMessage> {
    let mut chat = Vec::with_capacity(history.len() + 2);
    chat.push(ChatMessage::system(system_prompt));

    for message in history {
        chat.push(match message.role {
            MessageRole::Student => ChatMessage::user(message.content.as_str()),
            MessageRole::Tutor => ChatMessage::assistant(message.content.as_str()),
        });
    }

    chat.push(ChatMessage::user(current_message));
    chat
}

/// Drops the oldest conversation messages until the list fits in
/// `max_tokens`. The system prompt (first entry) always survives, even
/// when it alone blows the budget, and the most recent message is never
/// dropped.
pub fn truncate_window(mut messages: Vec<ChatMessage>, max_tokens: usize) -> Vec<ChatMessage> {
    if messages.is_empty() {
        return messages;
    }

    let system_tokens = estimate_tokens(&messages[0].content);
    if system_tokens >= max_tokens {
        tracing::warn!(
            system_tokens,
            max_tokens,
            "system prompt alone exceeds the context window"
        );
        messages.truncate(1);
        return messages;
    }

    let available = max_tokens - system_tokens;
    let mut total: usize = messages[1..]
        .iter()
        .map(|m| estimate_tokens(&m.content))
        .sum();
    let tokens_before = system_tokens + total;

    let mut dropped = 0usize;
    while total > available && messages.len() > 2 {
        let removed = messages.remove(1);
        total -= estimate_tokens(&removed.content);
        dropped += 1;
    }

    if dropped > 0 {
        tracing::debug!(
            dropped,
            tokens_before,
            tokens_after = system_tokens + total,
            max_tokens,
            "dropped oldest messages to fit the context window"
        );
    }

    messages
}

/// Conversion plus truncation in one step.
pub fn prepare_context(
    history: &[Message],
    current_message: &str,
    system_prompt: &str,
    max_tokens: usize,
) -> Vec<ChatMessage> {
    truncate_window(
        to_chat_messages(history, current_message, system_prompt),
        max_tokens,
    )
}
