use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::AuthenticatedMember;
use crate::error::AppError;
use crate::models::{ListMessagesQuery, MatchMessageResponse, MatchMessagesResponse, SendMessageRequest};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/messages/{match_id}", web::get().to(list_messages))
        .route("/messages/{match_id}", web::post().to(send_message));
}

/// List messages in a match conversation
///
/// GET /messages/{matchId}?limit=N
async fn list_messages(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
    path: web::Path<Uuid>,
    query: web::Query<ListMessagesQuery>,
) -> Result<HttpResponse, AppError> {
    let messages = state
        .match_channel
        .list_messages(path.into_inner(), member.id(), query.requested_limit())
        .await?;

    Ok(HttpResponse::Ok().json(MatchMessagesResponse { messages }))
}

/// Post a message to a match conversation
///
/// POST /messages/{matchId}
///
/// Request body:
/// ```json
/// { "content": "string (1..=1000 chars after trimming)" }
/// ```
async fn send_message(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
    path: web::Path<Uuid>,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let message = state
        .match_channel
        .add_message(path.into_inner(), member.id(), &req.content)
        .await?;

    Ok(HttpResponse::Ok().json(MatchMessageResponse { message }))
}
