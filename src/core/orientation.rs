use serde_json::Value;

use crate::models::{OpinionAnswer, OpinionOption};

/// Lowest value an opinion answer may take
pub const MIN_OPINION_VALUE: f64 = -10.0;
/// Highest value an opinion answer may take
pub const MAX_OPINION_VALUE: f64 = 10.0;

/// Why a batch of opinion answers was refused
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerError {
    Empty,
    MissingQuestion,
    OutOfRange { question_id: String, value: f64 },
}

impl AnswerError {
    pub fn message(&self) -> &'static str {
        match self {
            AnswerError::Empty => "Answer at least one question to generate a match.",
            AnswerError::MissingQuestion => "Each answer needs a question.",
            AnswerError::OutOfRange { .. } => "Answers must be between -10 and 10.",
        }
    }
}

/// Check a submission and collapse repeated questions (last answer wins)
///
/// The returned answers keep the order in which each question first appeared.
pub fn normalize_answers<'a>(answers: &[OpinionAnswer<'a>]) -> Result<Vec<OpinionAnswer<'a>>, AnswerError> {
    if answers.is_empty() {
        return Err(AnswerError::Empty);
    }

    let mut normalized: Vec<OpinionAnswer<'a>> = Vec::with_capacity(answers.len());
    for answer in answers {
        if answer.question_id.trim().is_empty() {
            return Err(AnswerError::MissingQuestion);
        }
        if !(MIN_OPINION_VALUE..=MAX_OPINION_VALUE).contains(&answer.value) {
            return Err(AnswerError::OutOfRange {
                question_id: answer.question_id.to_string(),
                value: answer.value,
            });
        }

        match normalized.iter_mut().find(|a| a.question_id == answer.question_id) {
            Some(existing) => existing.value = answer.value,
            None => normalized.push(*answer),
        }
    }

    Ok(normalized)
}

/// Orientation score: the arithmetic mean of a member's current answers
#[inline]
pub fn orientation_score(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Absolute distance between two scores, if both exist
#[inline]
pub fn orientation_gap(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a - b).abs()),
        _ => None,
    }
}

/// Decode stored question options into their canonical form
///
/// Accepted encodings:
/// - a JSON array of `{"label": .., "value": ..}` objects
/// - the same array serialized as a JSON string
/// - a delimited string such as `{"Agree:5","Disagree:-5"}` or `Agree=5;Disagree=-5`
///
/// Entries that cannot be read are skipped.
pub fn decode_options(raw: &Value) -> Vec<OpinionOption> {
    match raw {
        Value::Array(items) => items.iter().filter_map(decode_option_value).collect(),
        Value::String(text) => decode_options_text(text),
        _ => Vec::new(),
    }
}

fn decode_option_value(item: &Value) -> Option<OpinionOption> {
    match item {
        Value::Object(map) => {
            let label = map.get("label")?.as_str()?.trim();
            let value = match map.get("value")? {
                Value::Number(n) => n.as_f64()?,
                Value::String(s) => s.trim().parse::<f64>().ok()?,
                _ => return None,
            };
            if label.is_empty() || !value.is_finite() {
                return None;
            }
            Some(OpinionOption {
                label: label.to_string(),
                value,
            })
        }
        Value::String(s) => decode_option_pair(s),
        _ => None,
    }
}

fn decode_options_text(text: &str) -> Vec<OpinionOption> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if let Ok(parsed) = serde_json::from_str::<Value>(trimmed) {
        if parsed.is_array() {
            return decode_options(&parsed);
        }
    }

    // Postgres array literal braces are optional
    let body = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(trimmed);

    body.split(|c| c == ',' || c == ';' || c == '|')
        .filter_map(decode_option_pair)
        .collect()
}

fn decode_option_pair(entry: &str) -> Option<OpinionOption> {
    let entry = entry.trim().trim_matches(|c| c == '"' || c == '\'');
    let (label, value) = entry.rsplit_once(|c| c == ':' || c == '=')?;
    let label = label.trim();
    let value = value.trim().parse::<f64>().ok()?;
    if label.is_empty() || !value.is_finite() {
        return None;
    }
    Some(OpinionOption {
        label: label.to_string(),
        value,
    })
}
