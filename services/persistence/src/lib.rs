//! Persistence Layer
//!
//! SQLite-backed relational store for LoveConnect: profiles, photos, likes,
//! matches, messages and gifts. [`SqliteStore`] is also the production
//! [`match_engine::LikeStore`], so the match engine's units of work run as
//! immediate transactions on the same database.

pub mod error;
pub mod gifts;
pub mod matches;
pub mod messages;
pub mod schema;
pub mod seed;
pub mod stats;
pub mod store;
pub mod users;

pub use error::StoreError;
pub use seed::SeedReport;
pub use stats::Stats;
pub use store::SqliteStore;
