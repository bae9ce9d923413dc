use chrono::{DateTime, Utc};
use match_engine::{LikeOutcome, PairState};
use serde::{Deserialize, Serialize};
use types::ids::{GiftId, LikeId, MatchId, UserId};

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryQuery {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LikeRequest {
    pub liked_id: UserId,
    #[serde(default)]
    pub is_super: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub like_id: LikeId,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<MatchId>,
}

impl From<&LikeOutcome> for LikeResponse {
    fn from(outcome: &LikeOutcome) -> Self {
        Self {
            like_id: outcome.like_id,
            matched: outcome.matched,
            match_id: outcome.match_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MutualQuery {
    pub user_a: UserId,
    pub user_b: UserId,
}

#[derive(Debug, Clone, Serialize)]
pub struct MutualResponse {
    pub user_a: UserId,
    pub user_b: UserId,
    pub mutual: bool,
    /// Absent when both ids are the same user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<PairState>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub message_text: String,
}

/// Gift sent by the authenticated user
#[derive(Debug, Clone, Deserialize)]
pub struct SendGiftRequest {
    pub receiver_id: UserId,
    pub gift_id: GiftId,
    #[serde(default)]
    pub message: Option<String>,
}
