//! Match Derivation Engine
//!
//! Maintains the invariant "two users are matched if and only if each has
//! liked the other" and performs the transition exactly once per pair.
//!
//! **Key Invariants:**
//! - At most one like per ordered (liker, liked) pair
//! - At most one match per unordered pair, keyed by its canonical form
//! - Like insert, reciprocal check and match insert are one atomic unit
//! - Concurrent reciprocal likes still produce exactly one match
//!
//! Storage is injected through [`LikeStore`]; [`MemoryLikeStore`] is the
//! dependency-free implementation.

pub mod engine;
pub mod events;
pub mod memory;
pub mod state;
pub mod store;

pub use engine::{LikeOutcome, MatchEngine};
pub use events::MatchCreatedEvent;
pub use memory::MemoryLikeStore;
pub use state::PairState;
pub use store::{LikeLedger, LikeStore, MatchInsert};
