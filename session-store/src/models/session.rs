//! Session models for persistence.
//!
//! [`Session`] is the stored shape returned to clients; [`SessionDraft`]
//! is what clients submit (no timestamps, `sessionId` optional). The
//! `messages` and `stuck_state` table columns hold JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tutor_core::{CompletionStatus, Message, StuckState};

use crate::error::StoreError;

/// One tutoring session as persisted, camelCase on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_image_url: Option<String>,
    pub messages: Vec<Message>,
    pub completion_status: CompletionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stuck_state: Option<StuckState>,
}

/// Client-submitted session payload. A missing `session_id` means
/// "create"; a present one upserts that session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    #[serde(default)]
    pub session_id: Option<String>,
    pub user_id: String,
    #[serde(default)]
    pub problem_text: Option<String>,
    #[serde(default)]
    pub problem_image_url: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub completion_status: CompletionStatus,
    #[serde(default)]
    pub stuck_state: Option<StuckState>,
}

/// Raw table row; JSON columns are decoded in the [`Session`]
/// conversion.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SessionRow {
    pub session_id: String,
    pub user_id: String,
    pub problem_text: Option<String>,
    pub problem_image_url: Option<String>,
    pub messages: String,
    pub completion_status: String,
    pub stuck_state: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for Session {
    type Error = StoreError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        let messages: Vec<Message> = serde_json::from_str(&row.messages)?;
        let stuck_state: Option<StuckState> = row
            .stuck_state
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let completion_status = row
            .completion_status
            .parse::<CompletionStatus>()
            .map_err(StoreError::Serialization)?;

        Ok(Session {
            session_id: row.session_id,
            user_id: row.user_id,
            problem_text: row.problem_text,
            problem_image_url: row.problem_image_url,
            messages,
            completion_status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            stuck_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_serialize_camel_case() {
        let session = Session {
            session_id: "s1".to_string(),
            user_id: "u1".to_string(),
            problem_text: Some("2x + 5 = 13".to_string()),
            problem_image_url: None,
            messages: vec![Message::student("help")],
            completion_status: CompletionStatus::InProgress,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            stuck_state: None,
        };

        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["sessionId"], "s1");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["problemText"], "2x + 5 = 13");
        assert_eq!(json["completionStatus"], "in_progress");
        assert!(json.get("problemImageUrl").is_none());
        assert!(json.get("stuckState").is_none());
    }

    #[test]
    fn drafts_default_optional_fields() {
        let draft: SessionDraft = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        assert_eq!(draft.user_id, "u1");
        assert!(draft.session_id.is_none());
        assert!(draft.messages.is_empty());
        assert_eq!(draft.completion_status, CompletionStatus::InProgress);
    }
}
