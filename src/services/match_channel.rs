use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::content::{clamp_limit, normalize_content, MAX_MATCH_MESSAGE_CHARS};
use crate::error::AppError;
use crate::models::{MatchMessage, MemberSummary};
use crate::services::guard::AuthorizationGuard;

/// Conversation scoped to an active pairing
#[derive(Clone)]
pub struct MatchChannel {
    pool: PgPool,
    guard: AuthorizationGuard,
}

#[derive(Debug, sqlx::FromRow)]
struct MatchMessageRow {
    id: i64,
    match_id: Uuid,
    sender_id: Uuid,
    content: String,
    sent_at: DateTime<Utc>,
    author_name: Option<String>,
}

impl From<MatchMessageRow> for MatchMessage {
    fn from(row: MatchMessageRow) -> Self {
        let author = row.author_name.map(|display_name| MemberSummary {
            id: row.sender_id,
            display_name,
        });

        MatchMessage {
            id: row.id,
            match_id: row.match_id,
            sender_id: row.sender_id,
            content: row.content,
            sent_at: row.sent_at,
            author,
        }
    }
}

impl MatchChannel {
    pub fn new(pool: PgPool, guard: AuthorizationGuard) -> Self {
        Self { pool, guard }
    }

    /// Oldest-first messages for a match the member belongs to
    ///
    /// `limit` defaults to 50 and is capped at 200.
    pub async fn list_messages(
        &self,
        match_id: Uuid,
        member_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<MatchMessage>, AppError> {
        self.guard.require_active_match_member(match_id, member_id).await?;

        let rows: Vec<MatchMessageRow> = sqlx::query_as(
            r#"
            SELECT
                mm.id,
                mm.match_id,
                mm.sender_id,
                mm.content,
                mm.sent_at,
                mb.display_name AS author_name
            FROM match_messages mm
            LEFT JOIN members mb ON mb.id = mm.sender_id
            WHERE mm.match_id = $1
            ORDER BY mm.sent_at ASC, mm.id ASC
            LIMIT $2
            "#,
        )
        .bind(match_id)
        .bind(clamp_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MatchMessage::from).collect())
    }

    /// Append a message from `sender_id` and return it with the author attached
    pub async fn add_message(
        &self,
        match_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<MatchMessage, AppError> {
        self.guard.require_active_match_member(match_id, sender_id).await?;

        let content = normalize_content(content, MAX_MATCH_MESSAGE_CHARS)
            .map_err(|e| AppError::validation(e.message()))?;

        let mut tx = self.pool.begin().await?;

        // Membership is re-checked in the insert itself so a match that ends
        // after the guard ran cannot gain new messages
        let row: Option<MatchMessageRow> = sqlx::query_as(
            r#"
            WITH inserted AS (
                INSERT INTO match_messages (match_id, sender_id, content)
                SELECT $1, $2, $3
                WHERE EXISTS (
                    SELECT 1 FROM matches
                    WHERE id = $1
                      AND status = 'active'
                      AND (member_one_id = $2 OR member_two_id = $2)
                )
                RETURNING id, match_id, sender_id, content, sent_at
            )
            SELECT
                inserted.id,
                inserted.match_id,
                inserted.sender_id,
                inserted.content,
                inserted.sent_at,
                mb.display_name AS author_name
            FROM inserted
            LEFT JOIN members mb ON mb.id = inserted.sender_id
            "#,
        )
        .bind(match_id)
        .bind(sender_id)
        .bind(content)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tracing::info!("Match {} no longer open to member {}", match_id, sender_id);
            return Err(AppError::no_conversation_access());
        };

        tx.commit().await?;

        tracing::debug!("Member {} posted message {} in match {}", sender_id, row.id, match_id);

        Ok(row.into())
    }
}
