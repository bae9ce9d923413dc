//! Match types
//!
//! A match is an undirected relationship between two distinct users. It is
//! stored once per unordered pair, keyed by the [`MatchPair`] canonical form
//! (lower id first), so `{A, B}` and `{B, A}` always land on the same row.

use crate::ids::{MatchId, UserId};
use crate::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical unordered pair of distinct users
///
/// Invariant: `low < high`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchPair {
    low: UserId,
    high: UserId,
}

impl MatchPair {
    /// Canonicalize a pair of users. Returns `None` when both ids are the same.
    pub fn new(a: UserId, b: UserId) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Stored as `user1_id`
    pub fn low(&self) -> UserId {
        self.low
    }

    /// Stored as `user2_id`
    pub fn high(&self) -> UserId {
        self.high
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.low == user || self.high == user
    }
}

/// Stored match row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub user1_id: UserId,
    pub user2_id: UserId,
    pub is_active: bool,
    pub matched_at: DateTime<Utc>,
}

impl Match {
    pub fn pair(&self) -> MatchPair {
        MatchPair {
            low: self.user1_id,
            high: self.user2_id,
        }
    }

    pub fn involves(&self, user: UserId) -> bool {
        self.pair().contains(user)
    }
}

/// A match seen from one participant, with the other participant's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub matched_at: DateTime<Utc>,
    pub partner: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pair_is_canonical() {
        let ab = MatchPair::new(UserId::new(1), UserId::new(2)).unwrap();
        let ba = MatchPair::new(UserId::new(2), UserId::new(1)).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab.low(), UserId::new(1));
        assert_eq!(ab.high(), UserId::new(2));
    }

    #[test]
    fn test_self_pair_rejected() {
        assert!(MatchPair::new(UserId::new(3), UserId::new(3)).is_none());
    }

    #[test]
    fn test_pair_membership() {
        let pair = MatchPair::new(UserId::new(8), UserId::new(4)).unwrap();
        assert!(pair.contains(UserId::new(4)));
        assert!(pair.contains(UserId::new(8)));
        assert!(!pair.contains(UserId::new(5)));
    }

    proptest! {
        #[test]
        fn prop_pair_order_independent(a in any::<i64>(), b in any::<i64>()) {
            let (a, b) = (UserId::new(a), UserId::new(b));
            let forward = MatchPair::new(a, b);
            let backward = MatchPair::new(b, a);
            prop_assert_eq!(forward, backward);
            match forward {
                Some(pair) => {
                    prop_assert!(pair.low() < pair.high());
                    prop_assert!(pair.contains(a) && pair.contains(b));
                }
                None => prop_assert_eq!(a, b),
            }
        }
    }
}
