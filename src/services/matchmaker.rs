use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::core::orientation::orientation_gap;
use crate::core::selection::{PartnerSelector, Selection};
use crate::error::AppError;
use crate::models::{ActiveMatch, Candidate, MatchStatus, MemberSummary};

/// Advisory lock key that serialises match creation across all requests
///
/// Holding it for the whole check-select-insert sequence means no two
/// attempts can both see the same member as unmatched.
pub const MATCHMAKING_LOCK_KEY: i64 = 0x4d41_5443_484d_4b52;

/// Finds or creates an exclusive pairing for a member
#[derive(Clone)]
pub struct MatchMaker {
    pool: PgPool,
    selector: PartnerSelector,
    candidate_window: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ActiveMatchRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    status: String,
    partner_id: Option<Uuid>,
    partner_name: Option<String>,
    partner_score: Option<f64>,
    own_score: Option<f64>,
}

impl MatchMaker {
    pub fn new(pool: PgPool, min_gap: f64, candidate_window: u32) -> Self {
        Self {
            pool,
            selector: PartnerSelector::new(min_gap),
            candidate_window: i64::from(candidate_window.max(1)),
        }
    }

    /// Return the member's active match, creating one if a suitable partner exists
    ///
    /// `Ok(None)` means no match is available right now, which is a normal outcome.
    /// Repeated calls while matched return the same id.
    pub async fn attempt_match(&self, member_id: Uuid, score: f64) -> Result<Option<Uuid>, AppError> {
        match self.attempt_match_locked(member_id, score).await {
            Err(AppError::Database(err)) if is_unique_violation(&err) => {
                // Lost a race that slipped past the lock; whatever committed wins
                tracing::warn!("Concurrent match creation for member {}, re-reading", member_id);
                Ok(find_active_match_id(&self.pool, member_id).await?)
            }
            other => other,
        }
    }

    async fn attempt_match_locked(&self, member_id: Uuid, score: f64) -> Result<Option<Uuid>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Released automatically at commit or rollback
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(MATCHMAKING_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        if let Some(existing) = find_active_match_id(&mut *tx, member_id).await? {
            tx.commit().await?;
            tracing::debug!("Member {} already in match {}", member_id, existing);
            return Ok(Some(existing));
        }

        let candidates: Vec<Candidate> = sqlx::query_as(
            r#"
            SELECT op.member_id, op.score
            FROM orientation_profiles op
            WHERE op.member_id <> $1
              AND NOT EXISTS (
                  SELECT 1 FROM matches m
                  WHERE m.status = 'active'
                    AND (m.member_one_id = op.member_id OR m.member_two_id = op.member_id)
              )
            ORDER BY ABS(op.score - $2) ASC, op.member_id ASC
            LIMIT $3
            "#,
        )
        .bind(member_id)
        .bind(score)
        .bind(self.candidate_window)
        .fetch_all(&mut *tx)
        .await?;

        let (candidate, gap) = match self.selector.select(member_id, score, &candidates) {
            Selection::Pair { candidate, gap } => (candidate, gap),
            Selection::BelowThreshold { candidate, gap } => {
                tracing::debug!(
                    "Nearest candidate {} for member {} too close (gap {:.2} < {:.2})",
                    candidate.member_id,
                    member_id,
                    gap,
                    self.selector.min_gap()
                );
                return Ok(None);
            }
            Selection::NoCandidates => {
                tracing::debug!("No unmatched candidates for member {}", member_id);
                return Ok(None);
            }
        };

        let match_id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO matches (member_one_id, member_two_id, status)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(member_id)
        .bind(candidate.member_id)
        .bind(MatchStatus::Active.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            "Created match {} between {} and {} (gap {:.2})",
            match_id,
            member_id,
            candidate.member_id,
            gap
        );

        Ok(Some(match_id))
    }

    /// The member's active match with partner identity and orientation gap
    pub async fn get_active_match(&self, member_id: Uuid) -> Result<Option<ActiveMatch>, AppError> {
        let row: Option<ActiveMatchRow> = sqlx::query_as(
            r#"
            SELECT
                m.id,
                m.created_at,
                m.status,
                partner.id AS partner_id,
                partner.display_name AS partner_name,
                partner_profile.score AS partner_score,
                own_profile.score AS own_score
            FROM matches m
            LEFT JOIN members partner
                ON partner.id = CASE WHEN m.member_one_id = $1 THEN m.member_two_id ELSE m.member_one_id END
            LEFT JOIN orientation_profiles partner_profile
                ON partner_profile.member_id = CASE WHEN m.member_one_id = $1 THEN m.member_two_id ELSE m.member_one_id END
            LEFT JOIN orientation_profiles own_profile
                ON own_profile.member_id = $1
            WHERE m.status = 'active'
              AND (m.member_one_id = $1 OR m.member_two_id = $1)
            ORDER BY m.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status = MatchStatus::parse(&row.status)
            .ok_or_else(|| AppError::Internal(format!("invalid match status: {}", row.status)))?;

        let partner = match (row.partner_id, row.partner_name) {
            (Some(id), Some(display_name)) => Some(MemberSummary { id, display_name }),
            _ => None,
        };

        Ok(Some(ActiveMatch {
            id: row.id,
            created_at: row.created_at,
            status,
            partner,
            orientation_gap: orientation_gap(row.partner_score, row.own_score),
        }))
    }
}

async fn find_active_match_id<'e, E>(executor: E, member_id: Uuid) -> Result<Option<Uuid>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_scalar(
        r#"
        SELECT id FROM matches
        WHERE status = 'active'
          AND (member_one_id = $1 OR member_two_id = $1)
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(member_id)
    .fetch_optional(executor)
    .await
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}
