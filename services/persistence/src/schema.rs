//! Relational schema
//!
//! Tables for profiles, photos, likes, matches, messages and gifts. Every
//! user-owned row cascades on user delete. Uniqueness constraints carry the
//! like/match invariants:
//!
//! - `likes`: `UNIQUE(liker_id, liked_id)`, one edge per ordered pair
//! - `matches`: `UNIQUE(user1_id, user2_id)` with `user1_id < user2_id`,
//!   one row per unordered pair

use rusqlite::{Connection, Transaction, TransactionBehavior};
use tracing::info;

use crate::error::StoreError;

pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    email       TEXT    UNIQUE,
    age         INTEGER NOT NULL,
    country     TEXT    NOT NULL,
    bio         TEXT    NOT NULL DEFAULT '',
    verified    INTEGER NOT NULL DEFAULT 0,
    premium     INTEGER NOT NULL DEFAULT 0,
    distance_km INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT    NOT NULL,
    updated_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS photos (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    photo_url   TEXT    NOT NULL,
    is_primary  INTEGER NOT NULL DEFAULT 0,
    order_index INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS likes (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    liker_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    liked_id      INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    is_super_like INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT    NOT NULL,
    UNIQUE (liker_id, liked_id),
    CHECK (liker_id <> liked_id)
);

CREATE TABLE IF NOT EXISTS matches (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user1_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    user2_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    is_active  INTEGER NOT NULL DEFAULT 1,
    matched_at TEXT    NOT NULL,
    UNIQUE (user1_id, user2_id),
    CHECK (user1_id < user2_id)
);

CREATE TABLE IF NOT EXISTS messages (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    match_id     INTEGER NOT NULL REFERENCES matches(id) ON DELETE CASCADE,
    sender_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    message_text TEXT    NOT NULL,
    sent_at      TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS gifts (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT    NOT NULL UNIQUE,
    icon      TEXT    NOT NULL,
    price_czk INTEGER NOT NULL,
    price_eur TEXT    NOT NULL,
    category  TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS gift_transactions (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    receiver_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    gift_id     INTEGER NOT NULL REFERENCES gifts(id) ON DELETE CASCADE,
    message     TEXT,
    sent_at     TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_users_country ON users(country);
CREATE INDEX IF NOT EXISTS idx_users_age ON users(age);
CREATE INDEX IF NOT EXISTS idx_photos_user ON photos(user_id, order_index);
CREATE INDEX IF NOT EXISTS idx_likes_liked ON likes(liked_id);
CREATE INDEX IF NOT EXISTS idx_matches_user2 ON matches(user2_id);
CREATE INDEX IF NOT EXISTS idx_messages_match ON messages(match_id, sent_at);
CREATE INDEX IF NOT EXISTS idx_gift_tx_sender ON gift_transactions(sender_id);
CREATE INDEX IF NOT EXISTS idx_gift_tx_receiver ON gift_transactions(receiver_id);
"#;

/// Create missing tables and indexes, then stamp the schema version.
///
/// Safe to run on every start; an up-to-date database is left untouched.
pub fn migrate(conn: &Connection) -> Result<(), StoreError> {
    let found: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if found > SCHEMA_VERSION {
        return Err(StoreError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    tx.execute_batch(SCHEMA)?;
    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;

    info!(from = found, to = SCHEMA_VERSION, "Database schema migrated");
    Ok(())
}
