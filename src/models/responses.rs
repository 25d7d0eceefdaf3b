use serde::{Deserialize, Serialize};
use crate::models::domain::{
    ActiveMatch, CommunityMember, DirectMessage, MatchMessage, MemberSummary, OpinionQuestion,
};

/// Response for the preference submission endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesResponse {
    pub orientation_score: f64,
    #[serde(rename = "match")]
    pub active_match: Option<ActiveMatch>,
}

/// Response for the current-match endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    #[serde(rename = "match")]
    pub active_match: Option<ActiveMatch>,
    pub orientation_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<OpinionQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMessagesResponse {
    pub messages: Vec<MatchMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchMessageResponse {
    pub message: MatchMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub messages: Vec<DirectMessage>,
    pub partner: MemberSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectMessageResponse {
    pub message: DirectMessage,
    pub partner: MemberSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityResponse {
    pub members: Vec<CommunityMember>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
