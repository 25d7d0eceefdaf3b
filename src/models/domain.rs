use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A community member as referenced by the conversation components
///
/// The full record (email, credential hash) belongs to the identity service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub id: Uuid,
    pub display_name: String,
}

/// One answer to an opinion question
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpinionAnswer<'a> {
    pub question_id: &'a str,
    pub value: f64,
}

/// A selectable answer on an opinion question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionOption {
    pub label: String,
    pub value: f64,
}

/// An opinion question with its decoded options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpinionQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<OpinionOption>,
}

/// A member's position on the orientation spectrum
///
/// `None` means the member has not answered any question yet.
pub type OrientationScore = Option<f64>;

/// Lifecycle of a pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Active,
    Ended,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Active => "active",
            MatchStatus::Ended => "ended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(MatchStatus::Active),
            "ended" => Some(MatchStatus::Ended),
            _ => None,
        }
    }
}

/// A scored member eligible for pairing
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct Candidate {
    pub member_id: Uuid,
    pub score: f64,
}

/// The caller's active pairing, seen from their side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveMatch {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: MatchStatus,
    pub partner: Option<MemberSummary>,
    /// |partner score - own score|, absent when either side is unscored
    pub orientation_gap: Option<f64>,
}

/// A message inside a pairing's conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMessage {
    pub id: i64,
    pub match_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub author: Option<MemberSummary>,
}

/// A message in the open direct channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectMessage {
    pub id: i64,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub author: Option<MemberSummary>,
}

/// Direct conversation between the caller and one partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub partner: MemberSummary,
    pub messages: Vec<DirectMessage>,
}

/// Entry in the conversation-partner picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMember {
    pub id: Uuid,
    pub display_name: String,
    pub orientation_score: Option<f64>,
    pub joined_at: DateTime<Utc>,
}
