//! Event structures emitted by the match engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use types::ids::{MatchId, UserId};
use types::matches::Match;

/// A pair of users just became a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCreatedEvent {
    pub match_id: MatchId,
    pub user1_id: UserId,
    pub user2_id: UserId,
    pub matched_at: DateTime<Utc>,
}

impl MatchCreatedEvent {
    /// Whether `user` should be told about this match
    pub fn involves(&self, user: UserId) -> bool {
        self.user1_id == user || self.user2_id == user
    }
}

impl From<&Match> for MatchCreatedEvent {
    fn from(m: &Match) -> Self {
        Self {
            match_id: m.id,
            user1_id: m.user1_id,
            user2_id: m.user2_id,
            matched_at: m.matched_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_match() {
        let m = Match {
            id: MatchId::new(3),
            user1_id: UserId::new(1),
            user2_id: UserId::new(2),
            is_active: true,
            matched_at: Utc::now(),
        };
        let event = MatchCreatedEvent::from(&m);

        assert_eq!(event.match_id, m.id);
        assert!(event.involves(UserId::new(1)));
        assert!(event.involves(UserId::new(2)));
        assert!(!event.involves(UserId::new(3)));
    }
}
