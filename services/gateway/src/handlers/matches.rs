use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::models::SendMessageRequest;
use crate::rate_limit::Action;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use types::ids::{MatchId, UserId};
use types::matches::MatchSummary;
use types::message::MessageView;

pub async fn list_matches(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(user_id): ApiPath<UserId>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    user.require_self(user_id, "list matches")?;
    let matches = state.run_store(move |store| store.list_matches(user_id)).await?;
    Ok(Json(matches))
}

pub async fn list_messages(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(match_id): ApiPath<MatchId>,
) -> Result<Json<Vec<MessageView>>, AppError> {
    let viewer = user.user_id;
    let messages = state
        .run_store(move |store| store.list_messages(match_id, viewer))
        .await?;
    Ok(Json(messages))
}

pub async fn send_message(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(match_id): ApiPath<MatchId>,
    ApiJson(payload): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageView>), AppError> {
    state
        .rate_limiter
        .check_rate_limit(user.user_id, Action::Message)?;

    let sender = user.user_id;
    let message = state
        .run_store(move |store| store.send_message(match_id, sender, &payload.message_text))
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
