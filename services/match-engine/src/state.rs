//! Per-pair lifecycle
//!
//! ```text
//! NoInteraction --first like (either direction)--> OneSidedLike
//! OneSidedLike  --reciprocal like----------------> Matched
//! ```
//!
//! `Matched` is terminal. Recording another like for a matched pair never
//! creates a second match.

use serde::{Deserialize, Serialize};
use types::ids::{MatchId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PairState {
    NoInteraction,
    OneSidedLike { liker_id: UserId },
    Matched { match_id: MatchId },
}
