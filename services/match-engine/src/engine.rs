//! Match derivation engine
//!
//! Records likes and turns a pair of reciprocal likes into exactly one match.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use types::errors::LikeError;
use types::ids::{LikeId, MatchId, UserId};
use types::like::NewLike;
use types::matches::{Match, MatchPair};

use crate::state::PairState;
use crate::store::{LikeStore, MatchInsert};

/// Main match engine
#[derive(Debug, Clone)]
pub struct MatchEngine<S> {
    store: S,
}

/// Result of recording a like
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LikeOutcome {
    pub like_id: LikeId,
    /// Both directions now exist and a match is stored for the pair
    pub matched: bool,
    pub match_id: Option<MatchId>,
    /// Set only on the call that created the match row
    #[serde(skip)]
    pub new_match: Option<Match>,
}

impl LikeOutcome {
    fn one_sided(like_id: LikeId) -> Self {
        Self {
            like_id,
            matched: false,
            match_id: None,
            new_match: None,
        }
    }

    fn matched(like_id: LikeId, insert: MatchInsert) -> Self {
        let created = insert.was_created();
        let stored = insert.into_match();
        Self {
            like_id,
            matched: true,
            match_id: Some(stored.id),
            new_match: created.then_some(stored),
        }
    }
}

impl<S: LikeStore> MatchEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Record `liker_id -> liked_id` at the current time.
    ///
    /// See [`MatchEngine::record_like_at`].
    pub fn record_like(
        &self,
        liker_id: UserId,
        liked_id: UserId,
        is_super: bool,
    ) -> Result<LikeOutcome, LikeError> {
        self.record_like_at(liker_id, liked_id, is_super, Utc::now())
    }

    /// Record a like and derive the match if the reciprocal like exists.
    ///
    /// The existence checks, the like insert, the reciprocal lookup and the
    /// match insert run as one atomic unit: on any error nothing is written.
    ///
    /// # Errors
    /// - `SelfLike` when both ids are equal (checked before touching the store)
    /// - `UnknownUser` when either id has no profile
    /// - `DuplicateLike` when the ordered edge is already stored
    /// - `Persistence` when the store fails
    pub fn record_like_at(
        &self,
        liker_id: UserId,
        liked_id: UserId,
        is_super: bool,
        at: DateTime<Utc>,
    ) -> Result<LikeOutcome, LikeError> {
        let pair = MatchPair::new(liker_id, liked_id).ok_or(LikeError::SelfLike)?;
        let like = NewLike::new(liker_id, liked_id, is_super);

        let result = self.store.atomically(|ledger| {
            for user_id in [liker_id, liked_id] {
                if !ledger.user_exists(user_id)? {
                    return Err(LikeError::UnknownUser { user_id });
                }
            }

            let like_id = ledger
                .insert_like(&like, at)?
                .ok_or(LikeError::DuplicateLike { liker_id, liked_id })?;

            if ledger.find_reciprocal_like(liker_id, liked_id)?.is_none() {
                return Ok(LikeOutcome::one_sided(like_id));
            }

            let insert = ledger.insert_match_if_absent(pair, at)?;
            Ok(LikeOutcome::matched(like_id, insert))
        });

        match &result {
            Ok(outcome) if outcome.new_match.is_some() => info!(
                liker = %liker_id,
                liked = %liked_id,
                like_id = %outcome.like_id,
                match_id = ?outcome.match_id,
                "Mutual like, match created"
            ),
            Ok(outcome) => info!(
                liker = %liker_id,
                liked = %liked_id,
                like_id = %outcome.like_id,
                super_like = is_super,
                matched = outcome.matched,
                "Like recorded"
            ),
            Err(err) if err.is_duplicate() => debug!(%err, "Duplicate like ignored"),
            Err(err) if err.is_client_error() => {
                warn!(liker = %liker_id, liked = %liked_id, %err, "Like rejected")
            }
            Err(err) => error!(liker = %liker_id, liked = %liked_id, %err, "Like failed"),
        }

        result
    }

    /// True iff both `a -> b` and `b -> a` are stored. Symmetric in its
    /// arguments; a user is never mutual with themselves.
    pub fn check_mutual_like(&self, a: UserId, b: UserId) -> Result<bool, LikeError> {
        if a == b {
            return Ok(false);
        }
        self.store.atomically(|ledger| {
            Ok(ledger.find_like(a, b)?.is_some() && ledger.find_like(b, a)?.is_some())
        })
    }

    /// Where the unordered pair `{a, b}` stands in the like/match lifecycle
    pub fn pair_state(&self, a: UserId, b: UserId) -> Result<PairState, LikeError> {
        let pair = MatchPair::new(a, b).ok_or(LikeError::SelfLike)?;
        self.store.atomically(|ledger| {
            if let Some(stored) = ledger.find_match(pair)? {
                return Ok(PairState::Matched { match_id: stored.id });
            }
            if ledger.find_like(a, b)?.is_some() {
                return Ok(PairState::OneSidedLike { liker_id: a });
            }
            if ledger.find_like(b, a)?.is_some() {
                return Ok(PairState::OneSidedLike { liker_id: b });
            }
            Ok(PairState::NoInteraction)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLikeStore;

    fn uid(raw: i64) -> UserId {
        UserId::new(raw)
    }

    fn engine_with_users(count: i64) -> MatchEngine<MemoryLikeStore> {
        MatchEngine::new(MemoryLikeStore::with_users((1..=count).map(uid)))
    }

    #[test]
    fn test_one_sided_like() {
        let engine = engine_with_users(2);

        let outcome = engine.record_like(uid(1), uid(2), false).unwrap();

        assert!(!outcome.matched);
        assert!(outcome.match_id.is_none());
        assert!(!engine.check_mutual_like(uid(1), uid(2)).unwrap());
        assert!(engine.store().matches().is_empty());
    }

    #[test]
    fn test_reciprocal_like_creates_match() {
        let engine = engine_with_users(2);

        engine.record_like(uid(1), uid(2), false).unwrap();
        let outcome = engine.record_like(uid(2), uid(1), true).unwrap();

        assert!(outcome.matched);
        let created = outcome.new_match.expect("second like creates the match");
        assert_eq!(created.user1_id, uid(1));
        assert_eq!(created.user2_id, uid(2));
        assert!(created.is_active);
        assert_eq!(outcome.match_id, Some(created.id));
        assert_eq!(engine.store().matches().len(), 1);
    }

    struct UnavailableStore;

    impl LikeStore for UnavailableStore {
        fn atomically<T, F>(&self, _work: F) -> Result<T, LikeError>
        where
            F: FnOnce(&mut dyn crate::store::LikeLedger) -> Result<T, LikeError>,
        {
            Err(LikeError::persistence("database is locked"))
        }
    }

    #[test]
    fn test_store_failure_is_not_a_client_error() {
        let engine = MatchEngine::new(UnavailableStore);

        let err = engine.record_like(uid(1), uid(2), false).unwrap_err();
        assert!(matches!(err, LikeError::Persistence { .. }));
        assert!(!err.is_client_error());

        // Self-likes are refused before the store is touched.
        let err = engine.record_like(uid(1), uid(1), false).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_repeat_like_is_duplicate() {
        let engine = engine_with_users(2);

        engine.record_like(uid(1), uid(2), false).unwrap();
        engine.record_like(uid(2), uid(1), false).unwrap();
        let err = engine.record_like(uid(1), uid(2), false).unwrap_err();

        assert_eq!(
            err,
            LikeError::DuplicateLike {
                liker_id: uid(1),
                liked_id: uid(2)
            }
        );
        assert_eq!(engine.store().likes().len(), 2);
        assert_eq!(engine.store().matches().len(), 1);
    }

    #[test]
    fn test_super_flag_does_not_bypass_duplicate() {
        let engine = engine_with_users(2);

        engine.record_like(uid(1), uid(2), false).unwrap();
        let err = engine.record_like(uid(1), uid(2), true).unwrap_err();

        assert!(err.is_duplicate());
        assert!(!engine.store().likes()[0].is_super_like);
    }

    #[test]
    fn test_self_like_rejected_without_write() {
        let engine = engine_with_users(1);

        let err = engine.record_like(uid(1), uid(1), true).unwrap_err();

        assert_eq!(err, LikeError::SelfLike);
        assert!(engine.store().likes().is_empty());
    }

    #[test]
    fn test_unknown_user_rejected_without_write() {
        let engine = engine_with_users(1);

        let err = engine.record_like(uid(1), uid(99), false).unwrap_err();
        assert_eq!(err, LikeError::UnknownUser { user_id: uid(99) });

        let err = engine.record_like(uid(42), uid(1), false).unwrap_err();
        assert_eq!(err, LikeError::UnknownUser { user_id: uid(42) });

        assert!(engine.store().likes().is_empty());
    }

    #[test]
    fn test_existing_match_reported_not_duplicated() {
        let engine = engine_with_users(2);
        let pair = MatchPair::new(uid(1), uid(2)).unwrap();

        // A match row that predates the likes, e.g. left over from a
        // deactivated match.
        let prior = engine
            .store()
            .atomically(|ledger| ledger.insert_match_if_absent(pair, Utc::now()))
            .unwrap()
            .into_match();

        engine.record_like(uid(1), uid(2), false).unwrap();
        let outcome = engine.record_like(uid(2), uid(1), false).unwrap();

        assert!(outcome.matched);
        assert!(outcome.new_match.is_none());
        assert_eq!(outcome.match_id, Some(prior.id));
        assert_eq!(engine.store().matches().len(), 1);
    }

    #[test]
    fn test_mutual_check_is_symmetric() {
        let engine = engine_with_users(3);

        engine.record_like(uid(1), uid(2), false).unwrap();
        engine.record_like(uid(2), uid(1), false).unwrap();
        engine.record_like(uid(3), uid(1), false).unwrap();

        assert!(engine.check_mutual_like(uid(1), uid(2)).unwrap());
        assert!(engine.check_mutual_like(uid(2), uid(1)).unwrap());
        assert!(!engine.check_mutual_like(uid(1), uid(3)).unwrap());
        assert!(!engine.check_mutual_like(uid(3), uid(1)).unwrap());
        assert!(!engine.check_mutual_like(uid(1), uid(1)).unwrap());
    }

    #[test]
    fn test_pair_state_transitions() {
        let engine = engine_with_users(2);

        assert_eq!(
            engine.pair_state(uid(1), uid(2)).unwrap(),
            PairState::NoInteraction
        );

        engine.record_like(uid(2), uid(1), false).unwrap();
        assert_eq!(
            engine.pair_state(uid(1), uid(2)).unwrap(),
            PairState::OneSidedLike { liker_id: uid(2) }
        );

        let outcome = engine.record_like(uid(1), uid(2), false).unwrap();
        let match_id = outcome.match_id.unwrap();
        assert_eq!(
            engine.pair_state(uid(2), uid(1)).unwrap(),
            PairState::Matched { match_id }
        );
        assert_eq!(
            engine.pair_state(uid(1), uid(2)).unwrap(),
            PairState::Matched { match_id }
        );
    }

    #[test]
    fn test_outcome_serializes_without_match_row() {
        let engine = engine_with_users(2);
        engine.record_like(uid(1), uid(2), false).unwrap();
        let outcome = engine.record_like(uid(2), uid(1), false).unwrap();

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["matched"], true);
        assert!(json.get("new_match").is_none());
    }
}
