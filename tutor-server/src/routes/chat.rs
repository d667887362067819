//! `POST /api/chat`: one tutoring turn.
//!
//! Validates the payload field by field, derives stuck and
//! understanding state, assembles the Socratic system prompt with any
//! hint escalation, trims the conversation to the context window, and
//! calls the provider through the retry loop. The updated state rides
//! back in the response so stateless clients can thread it through the
//! next turn.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use context::{prepare_context, MAX_CONTEXT_WINDOW_TOKENS};
use guidance::{
    assess_response, build_prompt_with_hints, determine_understanding, questioning_instructions,
    StuckDetector,
};
use latex_parser::has_latex;
use prompt::SOCRATIC_TUTOR_PROMPT;
use tutor_core::{retry_with_backoff, Message, StuckState, TutorError, UnderstandingState};

use crate::response::{chat_error, failure, success};
use crate::server::AppState;

/// Parsed and validated chat payload. Parsing failures carry the
/// student-facing message for the 400 they produce.
#[derive(Debug)]
struct ChatRequest {
    message: String,
    history: Vec<Message>,
    stuck_state: Option<StuckState>,
    understanding_state: Option<UnderstandingState>,
}

impl ChatRequest {
    fn parse(body: &Value) -> Result<Self, &'static str> {
        let message = match body.get("message") {
            Some(Value::String(s)) => s.clone(),
            _ => return Err("Message is required and must be a string."),
        };

        let history = match body.get("conversationHistory") {
            None | Some(Value::Null) => Vec::new(),
            Some(value @ Value::Array(_)) => serde_json::from_value(value.clone())
                .map_err(|_| "Conversation history must be an array.")?,
            Some(_) => return Err("Conversation history must be an array."),
        };

        if message.trim().is_empty() && !has_alternate_content(body) {
            return Err("Message cannot be empty.");
        }

        // Client-held state is best effort. A malformed copy falls back
        // to re-derivation from history instead of failing the request.
        let stuck_state = body
            .get("stuckState")
            .and_then(|v| serde_json::from_value(v.clone()).ok());
        let understanding_state = body
            .get("understandingState")
            .and_then(|v| serde_json::from_value(v.clone()).ok());

        Ok(Self {
            message,
            history,
            stuck_state,
            understanding_state,
        })
    }
}

/// Whiteboard submissions may carry no typed message at all; any of
/// these fields stands in for one.
fn has_alternate_content(body: &Value) -> bool {
    ["whiteboardOCRText", "whiteboardImage", "whiteboardState"]
        .iter()
        .any(|key| match body.get(*key) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponseData {
    message: String,
    message_id: String,
    timestamp: String,
    stuck_state: StuckState,
    understanding_state: UnderstandingState,
}

/// Unique-enough id for one tutor message, sortable by creation time.
fn new_message_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("msg_{}_{}", Utc::now().timestamp_millis(), &suffix[..9])
}

#[instrument(skip_all)]
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return failure(StatusCode::BAD_REQUEST, "Invalid request format.");
    };

    let request = match ChatRequest::parse(&body) {
        Ok(request) => request,
        Err(message) => return failure(StatusCode::BAD_REQUEST, message),
    };

    let detector = StuckDetector::new();
    let prev_stuck = match &request.stuck_state {
        Some(stuck) => stuck.clone(),
        None if !request.history.is_empty() => detector.analyze_history(&request.history),
        None => StuckState::reset(),
    };
    let stuck = detector.track(&request.message, &request.history, &prev_stuck);

    let assessment = assess_response(&request.message);
    let understanding = determine_understanding(
        assessment.correctness,
        Some(&stuck),
        request.understanding_state.as_ref(),
    );

    info!(
        history_len = request.history.len(),
        is_stuck = stuck.is_stuck,
        consecutive_confused = stuck.consecutive_confused,
        understanding = understanding.level.as_str(),
        "Processing chat message"
    );

    let base_prompt = format!(
        "{}\n\n{}",
        SOCRATIC_TUTOR_PROMPT,
        questioning_instructions(understanding.level)
    );
    let system_prompt = build_prompt_with_hints(
        &base_prompt,
        stuck.is_stuck,
        stuck.consecutive_confused,
        None,
    );

    let messages = prepare_context(
        &request.history,
        &request.message,
        &system_prompt,
        MAX_CONTEXT_WINDOW_TOKENS,
    );

    let reply = retry_with_backoff(&state.retry_policy, TutorError::retry_class, || {
        let llm = state.llm.clone();
        let messages = messages.clone();
        async move { llm.chat_completion(messages).await }
    })
    .await;

    let reply = match reply {
        Ok(reply) => reply,
        Err(err) => {
            error!(error = %err, "Chat completion failed");
            let (status, message) = chat_error(&err);
            return failure(status, &message);
        }
    };

    if reply.trim().is_empty() {
        error!("Provider returned an empty reply");
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Invalid response format from AI. Please try again.",
        );
    }

    debug!(
        reply_len = reply.len(),
        has_latex = has_latex(&reply),
        "Tutor reply ready"
    );

    success(ChatResponseData {
        message: reply,
        message_id: new_message_id(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        stuck_state: stuck,
        understanding_state: understanding,
    })
}
