//! Store seam consumed by the engine
//!
//! The engine never talks to a database directly. It is handed a
//! [`LikeStore`], asks it to run a unit of work atomically, and performs
//! every read and write through the [`LikeLedger`] it receives.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use types::errors::LikeError;
use types::ids::{LikeId, UserId};
use types::like::NewLike;
use types::matches::{Match, MatchPair};

/// Result of a conflict-tolerant match insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchInsert {
    /// No row existed for the pair; this call created it
    Created(Match),
    /// A row already existed for the pair and was left untouched
    Existing(Match),
}

impl MatchInsert {
    pub fn into_match(self) -> Match {
        match self {
            MatchInsert::Created(m) | MatchInsert::Existing(m) => m,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, MatchInsert::Created(_))
    }
}

/// Operations available inside one transaction boundary
pub trait LikeLedger {
    fn user_exists(&mut self, user_id: UserId) -> Result<bool, LikeError>;

    /// Insert the edge unless the exact ordered edge already exists.
    ///
    /// Returns `None` when the edge was already present; nothing is written
    /// in that case.
    fn insert_like(&mut self, like: &NewLike, at: DateTime<Utc>) -> Result<Option<LikeId>, LikeError>;

    /// Look up the directed edge `liker_id -> liked_id`
    fn find_like(&mut self, liker_id: UserId, liked_id: UserId) -> Result<Option<LikeId>, LikeError>;

    /// Look up the edge that would make `liker_id -> liked_id` mutual
    fn find_reciprocal_like(
        &mut self,
        liker_id: UserId,
        liked_id: UserId,
    ) -> Result<Option<LikeId>, LikeError> {
        self.find_like(liked_id, liker_id)
    }

    /// Insert a match for the pair, or return the one already stored.
    ///
    /// Must be safe against a concurrent insert of the same pair: exactly one
    /// caller observes `Created`.
    fn insert_match_if_absent(
        &mut self,
        pair: MatchPair,
        at: DateTime<Utc>,
    ) -> Result<MatchInsert, LikeError>;

    fn find_match(&mut self, pair: MatchPair) -> Result<Option<Match>, LikeError>;
}

/// A store that can run ledger work atomically.
///
/// `work` either commits as a whole (when it returns `Ok`) or leaves no trace
/// (when it returns `Err`).
pub trait LikeStore: Send + Sync {
    fn atomically<T, F>(&self, work: F) -> Result<T, LikeError>
    where
        F: FnOnce(&mut dyn LikeLedger) -> Result<T, LikeError>;
}

impl<S: LikeStore> LikeStore for Arc<S> {
    fn atomically<T, F>(&self, work: F) -> Result<T, LikeError>
    where
        F: FnOnce(&mut dyn LikeLedger) -> Result<T, LikeError>,
    {
        (**self).atomically(work)
    }
}
