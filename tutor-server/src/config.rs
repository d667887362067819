//! Server configuration loaded from environment variables.

use std::env;

use anyhow::Result;

use llm_client::{
    DEFAULT_CHAT_MODEL, DEFAULT_MAX_COMPLETION_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_VISION_MODEL,
};

/// Runtime configuration for the API server. All fields come from the
/// environment; `load` fills in defaults for everything except the
/// OpenAI API key, which `validate` requires to be non-empty.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub openai_api_key: String,
    pub openai_base_url: Option<String>,
    pub chat_model: String,
    pub vision_model: String,
    pub max_completion_tokens: u32,
    pub temperature: f32,
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl ServerConfig {
    /// Reads configuration from the environment. `port` overrides
    /// `SERVER_PORT` when given (CLI flag).
    pub fn load(port: Option<u16>) -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let openai_base_url = env::var("OPENAI_BASE_URL").ok();

        let chat_model =
            env::var("OPENAI_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
        let vision_model =
            env::var("OPENAI_VISION_MODEL").unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string());
        let max_completion_tokens = env::var("MAX_COMPLETION_TOKENS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAX_COMPLETION_TOKENS);
        let temperature = env::var("TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = port.unwrap_or_else(|| {
            env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000)
        });

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/socratica.db".to_string());

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_file = env::var("LOG_FILE").ok();

        Ok(Self {
            openai_api_key,
            openai_base_url,
            chat_model,
            vision_model,
            max_completion_tokens,
            temperature,
            server_host,
            server_port,
            database_url,
            log_level,
            log_file,
        })
    }

    /// Checks the parts of the configuration that would otherwise fail
    /// deep inside a request: the API key and the base URL override.
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.trim().is_empty() {
            anyhow::bail!("OPENAI_API_KEY is not set");
        }

        if let Some(base_url) = &self.openai_base_url {
            if reqwest::Url::parse(base_url).is_err() {
                anyhow::bail!("OPENAI_BASE_URL is not a valid URL: {base_url}");
            }
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            anyhow::bail!(
                "TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.temperature
            );
        }

        Ok(())
    }
}
