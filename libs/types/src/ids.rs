//! Unique identifier types for LoveConnect entities
//!
//! Every id is the integer primary key assigned by the store. Ids are
//! totally ordered, which is what lets an unordered user pair be stored
//! canonically (see [`crate::matches::MatchPair`]).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw row id
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Get the raw row id
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a user profile
    UserId
);

define_id!(
    /// Unique identifier for a profile photo
    PhotoId
);

define_id!(
    /// Unique identifier for a directed like edge
    LikeId
);

define_id!(
    /// Unique identifier for a match between two users
    MatchId
);

define_id!(
    /// Unique identifier for a chat message inside a match
    MessageId
);

define_id!(
    /// Unique identifier for a gift in the catalog
    GiftId
);

define_id!(
    /// Unique identifier for a sent gift
    GiftTransactionId
);
