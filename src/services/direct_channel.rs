use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::core::content::{normalize_content, MAX_DIRECT_MESSAGE_CHARS};
use crate::error::AppError;
use crate::models::{CommunityMember, Conversation, DirectMessage, MemberSummary};

/// Open messaging between any two members, independent of pairing state
#[derive(Clone)]
pub struct DirectChannel {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct DirectMessageRow {
    id: i64,
    sender_id: Uuid,
    recipient_id: Uuid,
    content: String,
    sent_at: DateTime<Utc>,
    author_name: Option<String>,
}

impl From<DirectMessageRow> for DirectMessage {
    fn from(row: DirectMessageRow) -> Self {
        let author = row.author_name.map(|display_name| MemberSummary {
            id: row.sender_id,
            display_name,
        });

        DirectMessage {
            id: row.id,
            sender_id: row.sender_id,
            recipient_id: row.recipient_id,
            content: row.content,
            sent_at: row.sent_at,
            author,
        }
    }
}

impl DirectChannel {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a member by id
    pub async fn find_member(&self, member_id: Uuid) -> Result<Option<MemberSummary>, AppError> {
        Ok(find_member(&self.pool, member_id).await?)
    }

    /// Every message exchanged between the two members, oldest first
    ///
    /// Reading a conversation with yourself yields an empty list.
    pub async fn list_conversation(&self, self_id: Uuid, partner_id: Uuid) -> Result<Conversation, AppError> {
        let partner = self
            .find_member(partner_id)
            .await?
            .ok_or_else(member_not_found)?;

        if self_id == partner_id {
            return Ok(Conversation {
                partner,
                messages: Vec::new(),
            });
        }

        let rows: Vec<DirectMessageRow> = sqlx::query_as(
            r#"
            SELECT
                dm.id,
                dm.sender_id,
                dm.recipient_id,
                dm.content,
                dm.sent_at,
                mb.display_name AS author_name
            FROM direct_messages dm
            LEFT JOIN members mb ON mb.id = dm.sender_id
            WHERE (dm.sender_id = $1 AND dm.recipient_id = $2)
               OR (dm.sender_id = $2 AND dm.recipient_id = $1)
            ORDER BY dm.sent_at ASC, dm.id ASC
            "#,
        )
        .bind(self_id)
        .bind(partner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Conversation {
            partner,
            messages: rows.into_iter().map(DirectMessage::from).collect(),
        })
    }

    /// Send a message to another member
    ///
    /// Returns the stored message (with author) and the recipient.
    pub async fn send_message(
        &self,
        self_id: Uuid,
        partner_id: Uuid,
        content: &str,
    ) -> Result<(DirectMessage, MemberSummary), AppError> {
        let content = normalize_content(content, MAX_DIRECT_MESSAGE_CHARS)
            .map_err(|e| AppError::validation(e.message()))?;

        if self_id == partner_id {
            return Err(AppError::validation(
                "Start a conversation with someone else to continue.",
            ));
        }

        let mut tx = self.pool.begin().await?;

        let partner = find_member(&mut *tx, partner_id)
            .await?
            .ok_or_else(member_not_found)?;

        let row: DirectMessageRow = sqlx::query_as(
            r#"
            WITH inserted AS (
                INSERT INTO direct_messages (sender_id, recipient_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, sender_id, recipient_id, content, sent_at
            )
            SELECT
                inserted.id,
                inserted.sender_id,
                inserted.recipient_id,
                inserted.content,
                inserted.sent_at,
                mb.display_name AS author_name
            FROM inserted
            LEFT JOIN members mb ON mb.id = inserted.sender_id
            "#,
        )
        .bind(self_id)
        .bind(partner_id)
        .bind(content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Member {} sent direct message {} to {}", self_id, row.id, partner_id);

        Ok((row.into(), partner))
    }

    /// Every other member with their score and join time
    pub async fn list_community_members(&self, self_id: Uuid) -> Result<Vec<CommunityMember>, AppError> {
        let members: Vec<CommunityMember> = sqlx::query_as(
            r#"
            SELECT
                mb.id,
                mb.display_name,
                op.score AS orientation_score,
                mb.created_at AS joined_at
            FROM members mb
            LEFT JOIN orientation_profiles op ON op.member_id = mb.id
            WHERE mb.id <> $1
            ORDER BY LOWER(mb.display_name) ASC, mb.id ASC
            "#,
        )
        .bind(self_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}

async fn find_member<'e, E>(executor: E, member_id: Uuid) -> Result<Option<MemberSummary>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as("SELECT id, display_name FROM members WHERE id = $1")
        .bind(member_id)
        .fetch_optional(executor)
        .await
}

fn member_not_found() -> AppError {
    AppError::not_found("We could not find that member.")
}
