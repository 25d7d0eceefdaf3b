use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::AuthenticatedMember;
use crate::error::AppError;
use crate::models::{CommunityResponse, ConversationResponse, DirectMessageResponse, SendMessageRequest};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dm/{member_id}", web::get().to(get_conversation))
        .route("/dm/{member_id}", web::post().to(send_direct_message))
        .route("/community", web::get().to(list_community));
}

/// Direct conversation with another member
///
/// GET /dm/{memberId}
async fn get_conversation(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let conversation = state
        .direct_channel
        .list_conversation(member.id(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ConversationResponse {
        messages: conversation.messages,
        partner: conversation.partner,
    }))
}

/// Send a direct message
///
/// POST /dm/{memberId}
///
/// Request body:
/// ```json
/// { "content": "string (1..=2000 chars after trimming)" }
/// ```
async fn send_direct_message(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
    path: web::Path<Uuid>,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let (message, partner) = state
        .direct_channel
        .send_message(member.id(), path.into_inner(), &req.content)
        .await?;

    Ok(HttpResponse::Created().json(DirectMessageResponse { message, partner }))
}

/// Prospective conversation partners
///
/// GET /community
async fn list_community(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
) -> Result<HttpResponse, AppError> {
    let members = state.direct_channel.list_community_members(member.id()).await?;
    Ok(HttpResponse::Ok().json(CommunityResponse { members }))
}
