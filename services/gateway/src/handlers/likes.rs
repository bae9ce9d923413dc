use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::extract::{ApiJson, ApiQuery};
use crate::models::{LikeRequest, LikeResponse, MutualQuery, MutualResponse};
use crate::rate_limit::Action;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use match_engine::MatchCreatedEvent;

pub async fn record_like(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(payload): ApiJson<LikeRequest>,
) -> Result<(StatusCode, Json<LikeResponse>), AppError> {
    state
        .rate_limiter
        .check_rate_limit(user.user_id, Action::Like)?;

    let liker_id = user.user_id;
    let outcome = state
        .run_engine(move |engine| {
            engine.record_like(liker_id, payload.liked_id, payload.is_super)
        })
        .await?;

    if let Some(created) = &outcome.new_match {
        state.publish_match(MatchCreatedEvent::from(created));
    }

    Ok((StatusCode::CREATED, Json(LikeResponse::from(&outcome))))
}

pub async fn check_mutual(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MutualQuery>,
) -> Result<Json<MutualResponse>, AppError> {
    let MutualQuery { user_a, user_b } = query;
    let (mutual, pair) = state
        .run_engine(move |engine| {
            let mutual = engine.check_mutual_like(user_a, user_b)?;
            let pair = if user_a == user_b {
                None
            } else {
                Some(engine.pair_state(user_a, user_b)?)
            };
            Ok((mutual, pair))
        })
        .await?;

    Ok(Json(MutualResponse {
        user_a,
        user_b,
        mutual,
        pair,
    }))
}
