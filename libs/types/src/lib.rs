//! Types library for the LoveConnect dating backend
//!
//! This library provides the core type definitions shared by the match
//! engine, the relational store and the HTTP gateway.
//!
//! # Modules
//! - `ids`: Integer identifiers (UserId, LikeId, MatchId, ...)
//! - `user`: Profiles, photos, search filters
//! - `like`: Directed like edges
//! - `matches`: Canonical user pairs and match rows
//! - `message`: Chat messages inside a match
//! - `gift`: Gift catalog and gift transactions
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod user;
pub mod like;
pub mod matches;
pub mod message;
pub mod gift;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::user::*;
    pub use crate::like::*;
    pub use crate::matches::*;
    pub use crate::message::*;
    pub use crate::gift::*;
    pub use crate::errors::*;
}
