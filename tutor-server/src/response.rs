//! Response envelopes and error-to-status mapping.
//!
//! Chat and session endpoints share the `{"success", "data", "error"}`
//! envelope. The OCR endpoint keeps its own flat shape (`{"text"}` on
//! success, `{"error", "retry"?}` on failure) because its client
//! consumes the body directly. Error text here is student-facing; the
//! technical detail stays in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use tutor_core::TutorError;

/// 200 with the standard success envelope.
pub fn success<T: Serialize>(data: T) -> Response {
    Json(json!({
        "success": true,
        "data": data,
        "error": null,
    }))
    .into_response()
}

/// Error response in the standard envelope.
pub fn failure(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "data": null,
            "error": message,
        })),
    )
        .into_response()
}

/// Maps a provider/pipeline error to the chat endpoint's status and
/// student-facing message. Requests the provider rejected outright
/// (400 family) pass the provider's own detail through; everything
/// else gets a fixed message.
pub fn chat_error(err: &TutorError) -> (StatusCode, String) {
    let (status, message) = match err {
        TutorError::RateLimit(_) | TutorError::Quota(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests. Please wait a moment and try again.",
        ),
        TutorError::Authentication(_) => (
            StatusCode::UNAUTHORIZED,
            "Authentication error. Please check your API key.",
        ),
        TutorError::ContextOverflow(_) => (
            StatusCode::BAD_REQUEST,
            "Conversation is too long. Please start a new conversation.",
        ),
        TutorError::Validation(detail) => return (StatusCode::BAD_REQUEST, detail.clone()),
        TutorError::Timeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "Request timed out. Please try again or check your connection.",
        ),
        TutorError::Provider(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unable to get tutor response. Please try again.",
        ),
        TutorError::Unknown(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred. Please try again.",
        ),
    };
    (status, message.to_string())
}

/// OCR failure body. `retry` is only present when the client should
/// offer a retry button (rate limits and timeouts).
pub fn ocr_failure(status: StatusCode, message: &str, retry: bool) -> Response {
    let body = if retry {
        json!({ "error": message, "retry": true })
    } else {
        json!({ "error": message })
    };
    (status, Json(body)).into_response()
}

/// Maps a provider/pipeline error to the OCR endpoint's status,
/// message, and retry flag.
pub fn ocr_error(err: &TutorError) -> (StatusCode, &'static str, bool) {
    match err {
        TutorError::Validation(_) => (
            StatusCode::BAD_REQUEST,
            "Unable to read image. Please try a clearer photo or use text input.",
            false,
        ),
        TutorError::Quota(_) => (
            StatusCode::PAYMENT_REQUIRED,
            "OpenAI API quota exceeded. Please check your OpenAI account billing and add credits.",
            false,
        ),
        TutorError::RateLimit(_) => (
            StatusCode::TOO_MANY_REQUESTS,
            "Rate limit exceeded. Please try again in a moment.",
            true,
        ),
        TutorError::Timeout(_) => (
            StatusCode::GATEWAY_TIMEOUT,
            "Request timed out. Please try again.",
            true,
        ),
        TutorError::Authentication(_) | TutorError::Provider(_) | TutorError::ContextOverflow(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Unable to read image. Please try a clearer photo or use text input.",
            false,
        ),
        TutorError::Unknown(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred. Please try again or use text input.",
            false,
        ),
    }
}
