//! Session repository: persistence and queries for tutoring sessions.
//!
//! Uses SqlitePoolManager and the models (Session, SessionDraft).
//! External: SQLite via sqlx; callers use save/find_by_id/find_by_user/
//! delete/update_status.

use chrono::Utc;
use tracing::info;
use tutor_core::CompletionStatus;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{Session, SessionDraft, SessionRow};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SessionRepository {
    pool_manager: SqlitePoolManager,
}

impl SessionRepository {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StoreError> {
        info!("creating session tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                session_id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                problem_text TEXT,
                problem_image_url TEXT,
                messages TEXT NOT NULL,
                completion_status TEXT NOT NULL,
                stuck_state TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)")
            .execute(pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_sessions_updated_at ON sessions(updated_at)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Upserts a session. A missing `session_id` gets a fresh UUID.
    /// `created_at` is set once on insert; `updated_at` refreshes on
    /// every save. Returns the session as stored.
    pub async fn save(&self, draft: SessionDraft) -> Result<Session, StoreError> {
        let session_id = draft
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let now = Utc::now();
        let messages_json = serde_json::to_string(&draft.messages)?;
        let stuck_state_json = draft
            .stuck_state
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            r#"
            INSERT INTO sessions (session_id, user_id, problem_text, problem_image_url, messages, completion_status, stuck_state, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                user_id = excluded.user_id,
                problem_text = excluded.problem_text,
                problem_image_url = excluded.problem_image_url,
                messages = excluded.messages,
                completion_status = excluded.completion_status,
                stuck_state = excluded.stuck_state,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&session_id)
        .bind(&draft.user_id)
        .bind(&draft.problem_text)
        .bind(&draft.problem_image_url)
        .bind(&messages_json)
        .bind(draft.completion_status.as_str())
        .bind(&stuck_state_json)
        .bind(now)
        .bind(now)
        .execute(self.pool_manager.pool())
        .await?;

        info!(session_id = %session_id, user_id = %draft.user_id, "saved session");

        self.find_by_id(&session_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(session_id))
    }

    pub async fn find_by_id(&self, session_id: &str) -> Result<Option<Session>, StoreError> {
        let row: Option<SessionRow> =
            sqlx::query_as("SELECT * FROM sessions WHERE session_id = ?")
                .bind(session_id)
                .fetch_optional(self.pool_manager.pool())
                .await?;

        row.map(Session::try_from).transpose()
    }

    /// All of one user's sessions, most recently updated first.
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Session>, StoreError> {
        let rows: Vec<SessionRow> =
            sqlx::query_as("SELECT * FROM sessions WHERE user_id = ? ORDER BY updated_at DESC")
                .bind(user_id)
                .fetch_all(self.pool_manager.pool())
                .await?;

        info!(count = rows.len(), user_id = %user_id, "retrieved sessions");

        rows.into_iter().map(Session::try_from).collect()
    }

    /// Deletes a session if it belongs to `user_id`. Returns whether a
    /// row was removed; a non-owner delete removes nothing.
    pub async fn delete(&self, session_id: &str, user_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE session_id = ? AND user_id = ?")
            .bind(session_id)
            .bind(user_id)
            .execute(self.pool_manager.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn update_status(
        &self,
        session_id: &str,
        status: CompletionStatus,
    ) -> Result<Session, StoreError> {
        let result = sqlx::query(
            "UPDATE sessions SET completion_status = ?, updated_at = ? WHERE session_id = ?",
        )
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(session_id)
        .execute(self.pool_manager.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(session_id.to_string()));
        }

        self.find_by_id(session_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(session_id.to_string()))
    }
}
