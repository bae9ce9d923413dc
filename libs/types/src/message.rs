//! Chat messages exchanged inside a match

use crate::errors::ValidationError;
use crate::ids::{MatchId, MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest accepted message, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub match_id: MatchId,
    pub sender_id: UserId,
    pub message_text: String,
    pub sent_at: DateTime<Utc>,
}

/// Message joined with the sender's display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: Message,
    pub sender_name: String,
}

/// Trim and bound-check message text
pub fn validate_message_text(text: &str) -> Result<String, ValidationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    let len = text.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(ValidationError::MessageTooLong {
            len,
            max: MAX_MESSAGE_CHARS,
        });
    }
    Ok(text.to_string())
}
