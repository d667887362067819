//! OpenAI-backed [`LlmClient`]: chat completions for tutoring turns,
//! vision completions for whiteboard OCR.

use std::sync::{Arc, LazyLock};

use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImageArgs,
    ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, ImageUrlArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use base64::Engine;
use prompt::{ChatMessage, OCR_PROMPT};
use regex::Regex;
use tracing::instrument;
use tutor_core::{Result, TutorError};

use super::{chat_message_to_openai, mask_api_key, LlmClient};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// [`LlmClient`] over the OpenAI chat completions API.
#[derive(Clone)]
pub struct OpenAILlmClient {
    client: Arc<Client<OpenAIConfig>>,
    chat_model: String,
    vision_model: String,
    max_completion_tokens: u32,
    temperature: f32,
    masked_key: String,
}

impl OpenAILlmClient {
    pub fn new(api_key: String) -> Self {
        let masked_key = mask_api_key(&api_key);
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self::from_config(config, masked_key)
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let masked_key = mask_api_key(&api_key);
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self::from_config(config, masked_key)
    }

    fn from_config(config: OpenAIConfig, masked_key: String) -> Self {
        Self {
            client: Arc::new(Client::with_config(config)),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            max_completion_tokens: DEFAULT_MAX_COMPLETION_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            masked_key,
        }
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    pub fn with_max_completion_tokens(mut self, max_completion_tokens: u32) -> Self {
        self.max_completion_tokens = max_completion_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl LlmClient for OpenAILlmClient {
    #[instrument(skip(self, messages))]
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        tracing::debug!(
            model = %self.chat_model,
            message_count = messages.len(),
            api_key = %self.masked_key,
            "requesting chat completion"
        );

        let request_messages: Vec<ChatCompletionRequestMessage> = messages
            .iter()
            .map(chat_message_to_openai)
            .collect::<std::result::Result<_, _>>()
            .map_err(classify_openai_error)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .messages(request_messages)
            .max_tokens(self.max_completion_tokens)
            .temperature(self.temperature)
            .build()
            .map_err(classify_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_openai_error)?;

        let reply = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();

        if reply.is_empty() {
            return Err(TutorError::Provider(
                "invalid response format from OpenAI".to_string(),
            ));
        }

        Ok(reply)
    }

    #[instrument(skip(self, image))]
    async fn extract_text_from_image(&self, image: &[u8], mime_type: &str) -> Result<String> {
        tracing::debug!(
            model = %self.vision_model,
            image_bytes = image.len(),
            mime_type,
            api_key = %self.masked_key,
            "requesting text extraction"
        );

        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        let image_url = ImageUrlArgs::default()
            .url(format!("data:{mime_type};base64,{encoded}"))
            .build()
            .map_err(classify_openai_error)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.vision_model)
            .max_tokens(self.max_completion_tokens)
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(vec![
                    ChatCompletionRequestMessageContentPartTextArgs::default()
                        .text(OCR_PROMPT)
                        .build()
                        .map_err(classify_openai_error)?
                        .into(),
                    ChatCompletionRequestMessageContentPartImageArgs::default()
                        .image_url(image_url)
                        .build()
                        .map_err(classify_openai_error)?
                        .into(),
                ])
                .build()
                .map_err(classify_openai_error)?
                .into()])
            .build()
            .map_err(classify_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(classify_openai_error)?;

        let raw = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default()
            .trim()
            .to_string();

        if raw.is_empty() {
            return Err(TutorError::Validation(
                "No text could be extracted from the image.".to_string(),
            ));
        }

        Ok(clean_ocr_text(&raw))
    }
}

/// Folds the provider SDK's error shapes into the tutoring taxonomy.
/// The API error body carries no HTTP status, so classification keys
/// off the `type` field and well-known message wording.
fn classify_openai_error(err: OpenAIError) -> TutorError {
    match err {
        OpenAIError::ApiError(api) => {
            let kind = api.r#type.as_deref().unwrap_or_default().to_string();
            let message = api.message;
            let lowered = message.to_lowercase();

            if kind == "insufficient_quota" || lowered.contains("quota") {
                TutorError::Quota(message)
            } else if lowered.contains("rate limit") {
                TutorError::RateLimit(message)
            } else if kind == "authentication_error" || lowered.contains("api key") {
                TutorError::Authentication(message)
            } else if lowered.contains("context length") || lowered.contains("context_length") {
                TutorError::ContextOverflow(message)
            } else if kind == "invalid_request_error" {
                TutorError::Validation(message)
            } else {
                TutorError::Provider(message)
            }
        }
        OpenAIError::Reqwest(err) => {
            if err.is_timeout() {
                TutorError::Timeout(err.to_string())
            } else {
                TutorError::Provider(err.to_string())
            }
        }
        OpenAIError::JSONDeserialize(err) => TutorError::Provider(err.to_string()),
        OpenAIError::StreamError(message) => TutorError::Provider(message),
        other => TutorError::Unknown(other.to_string()),
    }
}

/// Vision models sometimes wrap output in markdown code fences; strip
/// them and collapse the leftover blank lines.
fn clean_ocr_text(text: &str) -> String {
    static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^```\w*\n?").unwrap());
    static FENCE_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)\n?```$").unwrap());
    static FENCE_TRAILING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)```\w*$").unwrap());
    static EXTRA_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

    if text.is_empty() {
        return String::new();
    }

    let cleaned = text.trim();
    let cleaned = FENCE_OPEN.replace_all(cleaned, "");
    let cleaned = FENCE_CLOSE.replace_all(&cleaned, "");
    let cleaned = FENCE_TRAILING.replace_all(&cleaned, "");
    let cleaned = cleaned.replace("```", "");
    let cleaned = EXTRA_NEWLINES.replace_all(&cleaned, "\n\n");
    cleaned.trim().to_string()
}
