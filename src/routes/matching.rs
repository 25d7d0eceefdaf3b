use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::auth::AuthenticatedMember;
use crate::error::AppError;
use crate::models::{
    first_validation_message, MatchResponse, PreferencesResponse, QuestionsResponse, SubmitPreferencesRequest,
};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/preferences", web::post().to(submit_preferences))
        .route("/preferences/questions", web::get().to(list_questions))
        .route("/match", web::get().to(get_match));
}

/// Submit opinion responses
///
/// POST /preferences
///
/// Request body:
/// ```json
/// {
///   "responses": [{ "questionId": "string", "value": -10..10 }]
/// }
/// ```
///
/// Saves the answers, recomputes the orientation score, then tries to pair
/// the member. Not finding a partner still returns 200 with `match: null`.
async fn submit_preferences(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
    req: web::Json<SubmitPreferencesRequest>,
) -> Result<HttpResponse, AppError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for preferences from {}: {:?}", member.id(), errors);
        return Err(AppError::validation(
            first_validation_message(&errors).unwrap_or_else(|| "Unable to save your responses.".to_string()),
        ));
    }

    let orientation_score = state
        .orientation
        .submit_responses(member.id(), &req.answers())
        .await?;

    state.matchmaker.attempt_match(member.id(), orientation_score).await?;
    let active_match = state.matchmaker.get_active_match(member.id()).await?;

    Ok(HttpResponse::Ok().json(PreferencesResponse {
        orientation_score,
        active_match,
    }))
}

/// Opinion questions with their answer options
///
/// GET /preferences/questions
async fn list_questions(
    state: web::Data<AppState>,
    _member: AuthenticatedMember,
) -> Result<HttpResponse, AppError> {
    let questions = state.orientation.list_questions().await?;
    Ok(HttpResponse::Ok().json(QuestionsResponse { questions }))
}

/// Current active match and own orientation score
///
/// GET /match
async fn get_match(
    state: web::Data<AppState>,
    member: AuthenticatedMember,
) -> Result<HttpResponse, AppError> {
    let (active_match, orientation_score) = tokio::try_join!(
        state.matchmaker.get_active_match(member.id()),
        state.orientation.get_orientation_score(member.id()),
    )?;

    Ok(HttpResponse::Ok().json(MatchResponse {
        active_match,
        orientation_score,
    }))
}
