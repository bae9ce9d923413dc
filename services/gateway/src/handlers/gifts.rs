use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::extract::ApiJson;
use crate::models::SendGiftRequest;
use crate::rate_limit::Action;
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use types::gift::{Gift, GiftTransaction, NewGiftTransaction};

pub async fn list_gifts(State(state): State<AppState>) -> Result<Json<Vec<Gift>>, AppError> {
    let gifts = state.run_store(|store| store.list_gifts()).await?;
    Ok(Json(gifts))
}

pub async fn send_gift(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(payload): ApiJson<SendGiftRequest>,
) -> Result<(StatusCode, Json<GiftTransaction>), AppError> {
    state
        .rate_limiter
        .check_rate_limit(user.user_id, Action::GiftSend)?;

    let gift = NewGiftTransaction {
        sender_id: user.user_id,
        receiver_id: payload.receiver_id,
        gift_id: payload.gift_id,
        message: payload.message,
    };
    let sent = state.run_store(move |store| store.send_gift(gift)).await?;
    Ok((StatusCode::CREATED, Json(sent)))
}
