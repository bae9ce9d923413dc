//! Like types
//!
//! A like is a directed edge `liker_id -> liked_id`. At most one edge exists
//! per ordered pair, and edges are never mutated once stored.

use crate::ids::{LikeId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored like edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub id: LikeId,
    pub liker_id: UserId,
    pub liked_id: UserId,
    /// Elevated significance only; does not change match derivation
    pub is_super_like: bool,
    pub created_at: DateTime<Utc>,
}

/// Like edge before it is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLike {
    pub liker_id: UserId,
    pub liked_id: UserId,
    pub is_super_like: bool,
}

impl NewLike {
    pub fn new(liker_id: UserId, liked_id: UserId, is_super_like: bool) -> Self {
        Self {
            liker_id,
            liked_id,
            is_super_like,
        }
    }
}
