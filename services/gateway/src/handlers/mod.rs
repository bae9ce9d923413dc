pub mod gifts;
pub mod health;
pub mod likes;
pub mod matches;
pub mod stats;
pub mod users;
pub mod ws;
