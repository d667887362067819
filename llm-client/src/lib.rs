//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait and an OpenAI implementation backed by
//! `async-openai`. Transport-agnostic; the HTTP layer holds an
//! `Arc<dyn LlmClient>` so tests can substitute scripted doubles.

use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
};
use async_trait::async_trait;
use prompt::{ChatMessage, ChatRole};
use tutor_core::Result;

mod openai_llm;

pub use openai_llm::{
    OpenAILlmClient, DEFAULT_CHAT_MODEL, DEFAULT_MAX_COMPLETION_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_VISION_MODEL,
};

/// Provider interface: plain chat completion and image-to-text
/// extraction. Both return reply text only; callers own the system
/// prompt and the context budget.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply for the given messages.
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Runs the vision model over an image and returns the extracted
    /// text, cleaned of markdown artifacts.
    async fn extract_text_from_image(&self, image: &[u8], mime_type: &str) -> Result<String>;
}

/// Masks an API key for logging: first 7 characters, `***`, last 4.
/// Keys too short to mask that way come back as `***` outright.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}***{tail}")
}

/// Converts a single [`ChatMessage`] into OpenAI API message format.
fn chat_message_to_openai(
    msg: &ChatMessage,
) -> std::result::Result<ChatCompletionRequestMessage, OpenAIError> {
    let content = msg.content.clone();
    let openai_msg: ChatCompletionRequestMessage = match msg.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()?
            .into(),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()?
            .into(),
    };
    Ok(openai_msg)
}
