//! Router assembly and server lifecycle.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;
use tracing::{error, info};

use llm_client::{mask_api_key, LlmClient, OpenAILlmClient};
use session_store::SessionRepository;
use tutor_core::{init_tracing, RetryPolicy};

use crate::config::ServerConfig;
use crate::routes;

/// Body cap for the whole router. Slightly above the OCR image limit
/// so multipart framing overhead does not eat into it; the handler
/// enforces the real 10MB cap on the decoded part.
const BODY_LIMIT_BYTES: usize = 12 * 1024 * 1024;

/// Shared handler state. Cheap to clone; the provider client sits
/// behind an `Arc` so tests can drop in scripted doubles.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn LlmClient>,
    pub sessions: SessionRepository,
    pub retry_policy: RetryPolicy,
}

/// Builds the API router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(routes::chat::send_message))
        .route("/api/ocr", post(routes::ocr::extract_text))
        .route(
            "/api/sessions",
            post(routes::sessions::save).get(routes::sessions::list),
        )
        .route(
            "/api/sessions/{id}",
            get(routes::sessions::fetch).delete(routes::sessions::remove),
        )
        .route(
            "/api/sessions/{id}/status",
            patch(routes::sessions::update_status),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}

fn build_llm_client(config: &ServerConfig) -> Arc<dyn LlmClient> {
    let client = match &config.openai_base_url {
        Some(base_url) => {
            OpenAILlmClient::with_base_url(config.openai_api_key.clone(), base_url.clone())
        }
        None => OpenAILlmClient::new(config.openai_api_key.clone()),
    };

    Arc::new(
        client
            .with_chat_model(config.chat_model.as_str())
            .with_vision_model(config.vision_model.as_str())
            .with_max_completion_tokens(config.max_completion_tokens)
            .with_temperature(config.temperature),
    )
}

/// Runs the server until shutdown. Assumes the configuration has
/// already been validated.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    init_tracing(config.log_file.as_deref(), &config.log_level)?;

    info!(
        chat_model = %config.chat_model,
        vision_model = %config.vision_model,
        database_url = %config.database_url,
        api_key = %mask_api_key(&config.openai_api_key),
        "Starting Socratica server"
    );

    let sessions = SessionRepository::new(&config.database_url).await?;
    let state = AppState {
        llm: build_llm_client(&config),
        sessions,
        retry_policy: RetryPolicy::default(),
    };

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!(error = %err, "Failed to listen for shutdown signal"),
    }
}
