//! LoveConnect HTTP gateway
//!
//! JSON API over the relational store and the match engine, plus a
//! WebSocket feed of newly created matches.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod rate_limit;
pub mod router;
pub mod state;
