//! In-memory like store
//!
//! Keeps users, likes and matches in ordered maps behind one mutex. A unit of
//! work runs against a scratch copy of the tables that replaces the live copy
//! only when the work succeeds, so a failed call leaves nothing behind.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use types::errors::LikeError;
use types::ids::{LikeId, MatchId, UserId};
use types::like::{Like, NewLike};
use types::matches::{Match, MatchPair};

use crate::store::{LikeLedger, LikeStore, MatchInsert};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeSet<UserId>,
    /// Keyed by the ordered (liker, liked) edge
    likes: BTreeMap<(UserId, UserId), Like>,
    /// Keyed by the canonical pair; at most one row per pair
    matches: BTreeMap<MatchPair, Match>,
    last_like_id: i64,
    last_match_id: i64,
}

/// Mutex-guarded [`LikeStore`] with no external dependencies
#[derive(Debug, Default)]
pub struct MemoryLikeStore {
    tables: Mutex<Tables>,
}

impl MemoryLikeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already knows the given users
    pub fn with_users(users: impl IntoIterator<Item = UserId>) -> Self {
        let store = Self::new();
        for user in users {
            store.add_user(user);
        }
        store
    }

    pub fn add_user(&self, user: UserId) {
        self.tables().users.insert(user);
    }

    /// Remove a user together with every like and match they take part in
    pub fn remove_user(&self, user: UserId) -> bool {
        let mut tables = self.tables();
        if !tables.users.remove(&user) {
            return false;
        }
        tables
            .likes
            .retain(|(liker, liked), _| *liker != user && *liked != user);
        tables.matches.retain(|pair, _| !pair.contains(user));
        true
    }

    pub fn likes(&self) -> Vec<Like> {
        self.tables().likes.values().cloned().collect()
    }

    pub fn matches(&self) -> Vec<Match> {
        self.tables().matches.values().cloned().collect()
    }

    /// Lock the tables. Transactions only swap in a fully built copy, so a
    /// poisoned lock still guards consistent tables.
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LikeStore for MemoryLikeStore {
    fn atomically<T, F>(&self, work: F) -> Result<T, LikeError>
    where
        F: FnOnce(&mut dyn LikeLedger) -> Result<T, LikeError>,
    {
        let mut live = self
            .tables
            .lock()
            .map_err(|e| LikeError::persistence(format!("store lock poisoned: {e}")))?;

        let mut scratch = live.clone();
        let output = work(&mut scratch)?;
        *live = scratch;
        Ok(output)
    }
}

impl LikeLedger for Tables {
    fn user_exists(&mut self, user_id: UserId) -> Result<bool, LikeError> {
        Ok(self.users.contains(&user_id))
    }

    fn insert_like(&mut self, like: &NewLike, at: DateTime<Utc>) -> Result<Option<LikeId>, LikeError> {
        let key = (like.liker_id, like.liked_id);
        if self.likes.contains_key(&key) {
            return Ok(None);
        }

        self.last_like_id += 1;
        let id = LikeId::new(self.last_like_id);
        self.likes.insert(
            key,
            Like {
                id,
                liker_id: like.liker_id,
                liked_id: like.liked_id,
                is_super_like: like.is_super_like,
                created_at: at,
            },
        );
        Ok(Some(id))
    }

    fn find_like(&mut self, liker_id: UserId, liked_id: UserId) -> Result<Option<LikeId>, LikeError> {
        Ok(self.likes.get(&(liker_id, liked_id)).map(|like| like.id))
    }

    fn insert_match_if_absent(
        &mut self,
        pair: MatchPair,
        at: DateTime<Utc>,
    ) -> Result<MatchInsert, LikeError> {
        if let Some(existing) = self.matches.get(&pair) {
            return Ok(MatchInsert::Existing(existing.clone()));
        }

        self.last_match_id += 1;
        let created = Match {
            id: MatchId::new(self.last_match_id),
            user1_id: pair.low(),
            user2_id: pair.high(),
            is_active: true,
            matched_at: at,
        };
        self.matches.insert(pair, created.clone());
        Ok(MatchInsert::Created(created))
    }

    fn find_match(&mut self, pair: MatchPair) -> Result<Option<Match>, LikeError> {
        Ok(self.matches.get(&pair).cloned())
    }
}
