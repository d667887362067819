//! `POST /api/ocr`: extract math problem text from an uploaded image.
//!
//! Multipart upload with a single `image` field. The file is checked
//! for type and size before the vision call; provider failures map to
//! statuses the client can act on, with a `retry` flag on the
//! transient ones.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, error, info, instrument};

use latex_parser::has_latex;
use tutor_core::{retry_with_backoff, TutorError};

use crate::response::{ocr_error, ocr_failure};
use crate::server::AppState;

/// Accepted upload types. `image/jpg` is not a real MIME type but
/// browsers send it anyway.
const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Upload cap, checked against the decoded part body.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

const UNEXPECTED_ERROR: &str = "An unexpected error occurred. Please try again or use text input.";

struct ImageUpload {
    content_type: String,
    bytes: Vec<u8>,
}

/// Pulls the `image` part out of the form. `Ok(None)` means the form
/// parsed fine but had no image field; `Err` means the form itself was
/// unreadable.
async fn read_image_field(mut multipart: Multipart) -> Result<Option<ImageUpload>, String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("failed to read multipart field: {e}"))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("failed to read image bytes: {e}"))?;

        return Ok(Some(ImageUpload {
            content_type,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

#[instrument(skip_all)]
pub async fn extract_text(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let Ok(multipart) = multipart else {
        return ocr_failure(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR, false);
    };

    let upload = match read_image_field(multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return ocr_failure(StatusCode::BAD_REQUEST, "No image file provided.", false);
        }
        Err(detail) => {
            error!(detail = %detail, "Could not read image upload");
            return ocr_failure(StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR, false);
        }
    };

    if !ALLOWED_IMAGE_TYPES.contains(&upload.content_type.as_str()) {
        return ocr_failure(
            StatusCode::BAD_REQUEST,
            "Invalid file type. Please upload a JPG, PNG, or WebP image.",
            false,
        );
    }

    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return ocr_failure(
            StatusCode::BAD_REQUEST,
            "File size exceeds the maximum limit of 10MB.",
            false,
        );
    }

    info!(
        content_type = %upload.content_type,
        size = upload.bytes.len(),
        "Extracting text from image"
    );

    let extracted = retry_with_backoff(&state.retry_policy, TutorError::retry_class, || {
        let llm = state.llm.clone();
        let bytes = upload.bytes.clone();
        let content_type = upload.content_type.clone();
        async move { llm.extract_text_from_image(&bytes, &content_type).await }
    })
    .await;

    match extracted {
        Ok(text) => {
            debug!(
                text_len = text.len(),
                has_latex = has_latex(&text),
                "OCR extraction complete"
            );
            Json(json!({ "text": text })).into_response()
        }
        Err(err) => {
            error!(error = %err, "OCR extraction failed");
            let (status, message, retry) = ocr_error(&err);
            ocr_failure(status, message, retry)
        }
    }
}
