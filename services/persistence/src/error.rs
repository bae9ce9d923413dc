//! Store errors

use thiserror::Error;
use types::errors::{LikeError, ValidationError};
use types::ids::{MatchId, UserId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Connection lock poisoned")]
    Poisoned,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("User {user_id} is not part of match {match_id}")]
    NotParticipant { match_id: MatchId, user_id: UserId },

    #[error("Match {match_id} is no longer active")]
    InactiveMatch { match_id: MatchId },

    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Database schema version {found} is newer than supported version {supported}")]
    SchemaTooNew { found: i64, supported: i64 },
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }
}

/// Anything the store cannot classify surfaces to the engine as a
/// persistence failure.
impl From<StoreError> for LikeError {
    fn from(err: StoreError) -> Self {
        LikeError::persistence(err.to_string())
    }
}
