// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActiveMatch, Candidate, CommunityMember, Conversation, DirectMessage, MatchMessage, MatchStatus,
    MemberSummary, OpinionAnswer, OpinionOption, OpinionQuestion, OrientationScore,
};
pub use requests::{first_validation_message, ListMessagesQuery, ResponseItem, SendMessageRequest, SubmitPreferencesRequest};
pub use responses::{
    CommunityResponse, ConversationResponse, DirectMessageResponse, ErrorResponse, HealthResponse,
    MatchMessageResponse, MatchMessagesResponse, MatchResponse, PreferencesResponse, QuestionsResponse,
};
