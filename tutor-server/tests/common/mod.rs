//! Shared harness for the API tests: scripted provider doubles, state
//! over an in-memory store, and request plumbing for driving the
//! router without a socket.
#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use llm_client::LlmClient;
use prompt::ChatMessage;
use session_store::SessionRepository;
use tutor_core::{Result, RetryPolicy, TutorError};
use tutor_server::{build_router, AppState};

/// Provider double that replies with a fixed string and counts calls.
pub struct FixedReplyLlm {
    reply: String,
    pub calls: AtomicU32,
}

impl FixedReplyLlm {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl LlmClient for FixedReplyLlm {
    async fn chat_completion(&self, _messages: Vec<ChatMessage>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }

    async fn extract_text_from_image(&self, _image: &[u8], _mime_type: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Provider double that records the messages it was called with.
pub struct RecordingLlm {
    reply: String,
    pub last_messages: Mutex<Vec<ChatMessage>>,
}

impl RecordingLlm {
    pub fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            last_messages: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LlmClient for RecordingLlm {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String> {
        *self.last_messages.lock().unwrap() = messages;
        Ok(self.reply.clone())
    }

    async fn extract_text_from_image(&self, _image: &[u8], _mime_type: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}

/// Provider double that fails every call with the same error class.
pub struct FailingLlm {
    make_error: fn() -> TutorError,
    pub calls: AtomicU32,
}

impl FailingLlm {
    pub fn new(make_error: fn() -> TutorError) -> Arc<Self> {
        Arc::new(Self {
            make_error,
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl LlmClient for FailingLlm {
    async fn chat_completion(&self, _messages: Vec<ChatMessage>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make_error)())
    }

    async fn extract_text_from_image(&self, _image: &[u8], _mime_type: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.make_error)())
    }
}

/// Retry schedule with real backoff shape but no meaningful sleeping.
pub fn fast_retry_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::from_millis(1),
        rate_limit_initial_delay: Duration::from_millis(1),
    }
}

pub async fn test_state(llm: Arc<dyn LlmClient>) -> AppState {
    let sessions = SessionRepository::new("sqlite::memory:")
        .await
        .expect("in-memory store");
    AppState {
        llm,
        sessions,
        retry_policy: fast_retry_policy(),
    }
}

pub async fn test_app(llm: Arc<dyn LlmClient>) -> Router {
    build_router(test_state(llm).await)
}

/// Sends one JSON request through the router and decodes the JSON
/// response body.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    body: &Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, request).await
}

/// Sends an arbitrary request through the router and decodes the JSON
/// response body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Builds a single-field multipart upload body and its content-type
/// header value.
pub fn multipart_image(
    field_name: &str,
    content_type: &str,
    data: &[u8],
) -> (String, Vec<u8>) {
    let boundary = "----socratica-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field_name}\"; filename=\"problem.png\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={boundary}"), body)
}
