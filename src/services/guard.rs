use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;

/// Decides whether a member may use a match conversation
#[derive(Clone)]
pub struct AuthorizationGuard {
    pool: PgPool,
}

impl AuthorizationGuard {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// True iff the match exists, is active, and the member is on either side
    pub async fn is_active_match_member(&self, match_id: Uuid, member_id: Uuid) -> Result<bool, AppError> {
        let allowed: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM matches
                WHERE id = $1
                  AND status = 'active'
                  AND (member_one_id = $2 OR member_two_id = $2)
            )
            "#,
        )
        .bind(match_id)
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(allowed)
    }

    /// Fail with an authorization error unless the member may use the match
    pub async fn require_active_match_member(&self, match_id: Uuid, member_id: Uuid) -> Result<(), AppError> {
        if self.is_active_match_member(match_id, member_id).await? {
            Ok(())
        } else {
            tracing::info!("Member {} denied access to match {}", member_id, match_id);
            Err(AppError::no_conversation_access())
        }
    }
}
