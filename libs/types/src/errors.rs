//! Error types shared across the LoveConnect services
//!
//! Comprehensive error taxonomy using thiserror

use crate::ids::UserId;
use thiserror::Error;

/// Failure of a like, as seen by the match derivation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LikeError {
    /// The liker and the liked user are the same person. Rejected before any write.
    #[error("A user cannot like themselves")]
    SelfLike,

    /// One of the ids does not reference an existing user. Nothing is written.
    #[error("Unknown user: {user_id}")]
    UnknownUser { user_id: UserId },

    /// The exact ordered edge already exists. Callers that only care about
    /// eventual state may treat this as success.
    #[error("User {liker_id} already liked user {liked_id}")]
    DuplicateLike { liker_id: UserId, liked_id: UserId },

    #[error("Persistence failure: {message}")]
    Persistence { message: String },
}

impl LikeError {
    pub fn persistence(message: impl Into<String>) -> Self {
        LikeError::Persistence {
            message: message.into(),
        }
    }

    /// True for failures caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(self, LikeError::Persistence { .. })
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, LikeError::DuplicateLike { .. })
    }
}

/// Input rejected before it reaches the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name must not be empty")]
    EmptyName,

    #[error("Age {age} is outside the allowed range {min}..={max}")]
    AgeOutOfRange { age: u32, min: u32, max: u32 },

    #[error("Invalid country code: {country}")]
    InvalidCountry { country: String },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error("Photo URL must not be empty")]
    EmptyPhotoUrl,

    #[error("Message text must not be empty")]
    EmptyMessage,

    #[error("Message is {len} characters long, the limit is {max}")]
    MessageTooLong { len: usize, max: usize },

    #[error("A user cannot send a gift to themselves")]
    SelfGift,

    #[error("Search limit must be between 1 and {max}, got {limit}")]
    InvalidLimit { limit: u32, max: u32 },

    #[error("Age range is empty: min {min} > max {max}")]
    EmptyAgeRange { min: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_error_display() {
        let err = LikeError::DuplicateLike {
            liker_id: UserId::new(1),
            liked_id: UserId::new(2),
        };
        assert_eq!(err.to_string(), "User 1 already liked user 2");
    }

    #[test]
    fn test_like_error_classification() {
        assert!(LikeError::SelfLike.is_client_error());
        assert!(LikeError::UnknownUser {
            user_id: UserId::new(9)
        }
        .is_client_error());
        assert!(!LikeError::persistence("disk full").is_client_error());
        assert!(LikeError::DuplicateLike {
            liker_id: UserId::new(1),
            liked_id: UserId::new(2),
        }
        .is_duplicate());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::AgeOutOfRange {
            age: 12,
            min: 18,
            max: 120,
        };
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains("18..=120"));
    }
}
