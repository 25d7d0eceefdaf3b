use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::models::domain::OpinionAnswer;

/// Request to submit opinion responses
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitPreferencesRequest {
    #[validate(
        length(min = 1, message = "Answer at least one question to generate a match."),
        nested
    )]
    pub responses: Vec<ResponseItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResponseItem {
    #[validate(length(min = 1, message = "Each answer needs a question."))]
    #[serde(alias = "question_id", rename = "questionId")]
    pub question_id: String,
    #[validate(range(min = -10.0, max = 10.0, message = "Answers must be between -10 and 10."))]
    pub value: f64,
}

impl SubmitPreferencesRequest {
    pub fn answers(&self) -> Vec<OpinionAnswer<'_>> {
        self.responses
            .iter()
            .map(|r| OpinionAnswer {
                question_id: &r.question_id,
                value: r.value,
            })
            .collect()
    }
}

/// Request to send a message on either channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: String,
}

/// Query for listing match messages
///
/// `limit` is kept as raw text so an unreadable value falls back to the
/// default page size instead of failing the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMessagesQuery {
    pub limit: Option<String>,
}

impl ListMessagesQuery {
    /// The requested page size, if it reads as a number
    ///
    /// Fractions are truncated. Anything else yields `None`.
    pub fn requested_limit(&self) -> Option<i64> {
        let raw = self.limit.as_deref()?.trim();
        if let Ok(limit) = raw.parse::<i64>() {
            return Some(limit);
        }
        raw.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(|n| n.trunc() as i64)
    }
}

/// First human-readable message found in a validation error tree
pub fn first_validation_message(errors: &ValidationErrors) -> Option<String> {
    errors.errors().values().find_map(|kind| match kind {
        ValidationErrorsKind::Field(list) => list
            .iter()
            .find_map(|e| e.message.as_ref().map(|m| m.to_string())),
        ValidationErrorsKind::Struct(inner) => first_validation_message(inner),
        ValidationErrorsKind::List(items) => items.values().find_map(|inner| first_validation_message(inner)),
    })
}
