//! `/api/sessions`: CRUD over stored tutoring sessions.
//!
//! Thin handlers over [`SessionRepository`]. Ownership is enforced on
//! delete (the id alone is not enough); reads are by id or by user.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use session_store::{SessionDraft, StoreError};
use tutor_core::CompletionStatus;

use crate::response::{failure, success};
use crate::server::AppState;

const USER_ID_REQUIRED: &str = "userId is required and must be a string.";
const SESSION_NOT_FOUND: &str = "Session not found.";

#[derive(Deserialize)]
pub struct UserQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

fn store_failure(err: &StoreError) -> Response {
    match err {
        StoreError::NotFound(_) => failure(StatusCode::NOT_FOUND, SESSION_NOT_FOUND),
        _ => {
            error!(error = %err, "Session store operation failed");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred. Please try again.",
            )
        }
    }
}

#[instrument(skip_all)]
pub async fn save(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return failure(StatusCode::BAD_REQUEST, "Invalid request format.");
    };

    match body.get("userId") {
        Some(Value::String(user_id)) if !user_id.trim().is_empty() => {}
        _ => return failure(StatusCode::BAD_REQUEST, USER_ID_REQUIRED),
    }

    let draft: SessionDraft = match serde_json::from_value(body) {
        Ok(draft) => draft,
        Err(err) => {
            error!(error = %err, "Rejected malformed session payload");
            return failure(StatusCode::BAD_REQUEST, "Invalid session payload.");
        }
    };

    match state.sessions.save(draft).await {
        Ok(session) => {
            info!(session_id = %session.session_id, "Session saved");
            success(session)
        }
        Err(err) => store_failure(&err),
    }
}

#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Response {
    let user_id = match query.user_id.as_deref() {
        Some(user_id) if !user_id.trim().is_empty() => user_id.to_string(),
        _ => return failure(StatusCode::BAD_REQUEST, USER_ID_REQUIRED),
    };

    match state.sessions.find_by_user(&user_id).await {
        Ok(sessions) => success(sessions),
        Err(err) => store_failure(&err),
    }
}

#[instrument(skip_all)]
pub async fn fetch(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.sessions.find_by_id(&session_id).await {
        Ok(Some(session)) => success(session),
        Ok(None) => failure(StatusCode::NOT_FOUND, SESSION_NOT_FOUND),
        Err(err) => store_failure(&err),
    }
}

#[instrument(skip_all)]
pub async fn remove(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> Response {
    let user_id = match query.user_id.as_deref() {
        Some(user_id) if !user_id.trim().is_empty() => user_id.to_string(),
        _ => return failure(StatusCode::BAD_REQUEST, USER_ID_REQUIRED),
    };

    match state.sessions.delete(&session_id, &user_id).await {
        Ok(true) => {
            info!(session_id = %session_id, "Session deleted");
            success(json!({ "deleted": true }))
        }
        Ok(false) => failure(StatusCode::NOT_FOUND, SESSION_NOT_FOUND),
        Err(err) => store_failure(&err),
    }
}

#[instrument(skip_all)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = payload else {
        return failure(StatusCode::BAD_REQUEST, "Invalid request format.");
    };

    let status = match body.get("status") {
        Some(Value::String(s)) => s.clone(),
        _ => return failure(StatusCode::BAD_REQUEST, "status is required and must be a string."),
    };

    let status: CompletionStatus = match status.parse() {
        Ok(status) => status,
        Err(_) => {
            return failure(
                StatusCode::BAD_REQUEST,
                "Invalid status. Must be one of: solved, not_solved, in_progress.",
            );
        }
    };

    match state.sessions.update_status(&session_id, status).await {
        Ok(session) => {
            info!(session_id = %session.session_id, status = status.as_str(), "Session status updated");
            success(session)
        }
        Err(err) => store_failure(&err),
    }
}
