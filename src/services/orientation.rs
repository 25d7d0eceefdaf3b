use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::orientation::{decode_options, normalize_answers, orientation_score};
use crate::error::AppError;
use crate::models::{OpinionAnswer, OpinionQuestion, OrientationScore};

#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    id: String,
    prompt: String,
    options: Value,
}

impl From<QuestionRow> for OpinionQuestion {
    fn from(row: QuestionRow) -> Self {
        OpinionQuestion {
            id: row.id,
            prompt: row.prompt,
            options: decode_options(&row.options),
        }
    }
}

/// Persists opinion answers and keeps each member's orientation score current
#[derive(Clone)]
pub struct OrientationAggregator {
    pool: PgPool,
}

impl OrientationAggregator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a member's answers and return their recomputed score
    ///
    /// Answers are upserted per (member, question), so resubmitting a question
    /// replaces the earlier value. Validation, the upsert, the recompute and the
    /// profile write all happen before a single commit.
    pub async fn submit_responses(
        &self,
        member_id: Uuid,
        answers: &[OpinionAnswer<'_>],
    ) -> Result<f64, AppError> {
        let answers = normalize_answers(answers).map_err(|e| AppError::validation(e.message()))?;

        let question_ids: Vec<String> = answers.iter().map(|a| a.question_id.to_string()).collect();
        let values: Vec<f64> = answers.iter().map(|a| a.value).collect();

        let mut tx = self.pool.begin().await?;

        let known: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM opinion_questions WHERE id = ANY($1)",
        )
        .bind(&question_ids)
        .fetch_all(&mut *tx)
        .await?;

        if let Some(unknown) = question_ids.iter().find(|id| !known.contains(id)) {
            tracing::info!("Member {} answered unknown question {}", member_id, unknown);
            return Err(AppError::not_found("One of the questions could not be found."));
        }

        sqlx::query(
            r#"
            INSERT INTO opinion_responses (member_id, question_id, selected_value, submitted_at)
            SELECT $1, answer.question_id, answer.selected_value, NOW()
            FROM UNNEST($2::text[], $3::float8[]) AS answer(question_id, selected_value)
            ON CONFLICT (member_id, question_id)
            DO UPDATE SET
                selected_value = EXCLUDED.selected_value,
                submitted_at = EXCLUDED.submitted_at
            "#,
        )
        .bind(member_id)
        .bind(&question_ids)
        .bind(&values)
        .execute(&mut *tx)
        .await?;

        let current: Vec<f64> = sqlx::query_scalar(
            "SELECT selected_value FROM opinion_responses WHERE member_id = $1",
        )
        .bind(member_id)
        .fetch_all(&mut *tx)
        .await?;

        let score = orientation_score(&current)
            .ok_or_else(|| AppError::Internal("no responses after upsert".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO orientation_profiles (member_id, score, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (member_id)
            DO UPDATE SET score = EXCLUDED.score, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(member_id)
        .bind(score)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            "Member {} submitted {} answers, orientation score now {:.2}",
            member_id,
            answers.len(),
            score
        );

        Ok(score)
    }

    /// The member's persisted score, `None` while unscored
    pub async fn get_orientation_score(&self, member_id: Uuid) -> Result<OrientationScore, AppError> {
        let score: Option<f64> = sqlx::query_scalar(
            "SELECT score FROM orientation_profiles WHERE member_id = $1",
        )
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(score)
    }

    /// All opinion questions in display order
    pub async fn list_questions(&self) -> Result<Vec<OpinionQuestion>, AppError> {
        let rows: Vec<QuestionRow> = sqlx::query_as(
            r#"
            SELECT id, prompt, options
            FROM opinion_questions
            ORDER BY position ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let questions = rows.into_iter().map(OpinionQuestion::from).collect();

        Ok(questions)
    }
}
