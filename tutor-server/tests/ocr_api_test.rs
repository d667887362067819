//! Integration tests for `POST /api/ocr`: multipart validation and
//! provider error mapping, including the retry flag.

mod common;

use std::sync::atomic::Ordering;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tutor_core::TutorError;

use common::{multipart_image, send, send_json, test_app, FailingLlm, FixedReplyLlm};

async fn post_image(
    app: &axum::Router,
    field_name: &str,
    content_type: &str,
    data: &[u8],
) -> (StatusCode, serde_json::Value) {
    let (header, body) = multipart_image(field_name, content_type, data);
    let request = Request::builder()
        .method("POST")
        .uri("/api/ocr")
        .header("content-type", header)
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_ocr_happy_path() {
    let llm = FixedReplyLlm::new("Solve for x: 2x + 3 = 7");
    let app = test_app(llm.clone()).await;

    let (status, body) = post_image(&app, "image", "image/png", b"fake png bytes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], json!("Solve for x: 2x + 3 = 7"));
    assert!(body.get("error").is_none());
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_ocr_accepts_the_jpg_alias() {
    let llm = FixedReplyLlm::new("y = mx + b");
    let app = test_app(llm).await;

    let (status, body) = post_image(&app, "image", "image/jpg", b"fake jpeg bytes").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["text"], json!("y = mx + b"));
}

#[tokio::test]
async fn test_ocr_missing_image_field() {
    let llm = FixedReplyLlm::new("unused");
    let app = test_app(llm.clone()).await;

    let (status, body) = post_image(&app, "attachment", "image/png", b"bytes").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("No image file provided."));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ocr_rejects_unsupported_type() {
    let llm = FixedReplyLlm::new("unused");
    let app = test_app(llm.clone()).await;

    let (status, body) = post_image(&app, "image", "image/gif", b"GIF89a").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("Invalid file type. Please upload a JPG, PNG, or WebP image.")
    );
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ocr_rejects_oversized_image() {
    let llm = FixedReplyLlm::new("unused");
    let app = test_app(llm.clone()).await;

    let oversized = vec![0u8; 10 * 1024 * 1024 + 1];
    let (status, body) = post_image(&app, "image", "image/png", &oversized).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("File size exceeds the maximum limit of 10MB.")
    );
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ocr_unreadable_image_maps_to_400() {
    let llm = FailingLlm::new(|| {
        TutorError::Validation("No text could be extracted from the image.".to_string())
    });
    let app = test_app(llm.clone()).await;

    let (status, body) = post_image(&app, "image", "image/png", b"blurry").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        json!("Unable to read image. Please try a clearer photo or use text input.")
    );
    assert!(body.get("retry").is_none());
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_ocr_quota_maps_to_402_without_retry() {
    let llm = FailingLlm::new(|| TutorError::Quota("insufficient_quota".to_string()));
    let app = test_app(llm.clone()).await;

    let (status, body) = post_image(&app, "image", "image/png", b"bytes").await;

    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(
        body["error"],
        json!("OpenAI API quota exceeded. Please check your OpenAI account billing and add credits.")
    );
    assert!(body.get("retry").is_none());
    assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_ocr_rate_limit_retries_then_maps_to_429_with_retry_flag() {
    let llm = FailingLlm::new(|| TutorError::RateLimit("429".to_string()));
    let app = test_app(llm.clone()).await;

    let (status, body) = post_image(&app, "image", "image/png", b"bytes").await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["error"],
        json!("Rate limit exceeded. Please try again in a moment.")
    );
    assert_eq!(body["retry"], json!(true));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_ocr_timeout_retries_then_maps_to_504_with_retry_flag() {
    let llm = FailingLlm::new(|| TutorError::Timeout("deadline".to_string()));
    let app = test_app(llm.clone()).await;

    let (status, body) = post_image(&app, "image", "image/png", b"bytes").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], json!("Request timed out. Please try again."));
    assert_eq!(body["retry"], json!(true));
    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_ocr_provider_failure_maps_to_unreadable_image_500() {
    let llm = FailingLlm::new(|| TutorError::Provider("502".to_string()));
    let app = test_app(llm.clone()).await;

    let (status, body) = post_image(&app, "image", "image/png", b"bytes").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        json!("Unable to read image. Please try a clearer photo or use text input.")
    );
    assert!(body.get("retry").is_none());
    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_ocr_unknown_failure_maps_to_unexpected_500() {
    let llm = FailingLlm::new(|| TutorError::Unknown("weird".to_string()));
    let app = test_app(llm.clone()).await;

    let (status, body) = post_image(&app, "image", "image/png", b"bytes").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        json!("An unexpected error occurred. Please try again or use text input.")
    );
    assert_eq!(llm.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_ocr_non_multipart_body_is_unexpected_error() {
    let llm = FixedReplyLlm::new("unused");
    let app = test_app(llm.clone()).await;

    let (status, body) = send_json(&app, "POST", "/api/ocr", &json!({ "image": "nope" })).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        json!("An unexpected error occurred. Please try again or use text input.")
    );
    assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
}
