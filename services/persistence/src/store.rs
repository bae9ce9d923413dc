//! SQLite store handle and the match engine's ledger
//!
//! One connection behind a mutex, like every other embedded store in the
//! system. Writes run in `BEGIN IMMEDIATE` transactions so the write lock is
//! taken up front; two handles on the same database file therefore serialize
//! their like/match units of work instead of interleaving them.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;
use types::errors::LikeError;
use types::ids::{LikeId, UserId};
use types::like::NewLike;
use types::matches::{Match, MatchPair};

use match_engine::{LikeLedger, LikeStore, MatchInsert};

use crate::error::StoreError;
use crate::matches::{match_from_row, MATCH_COLUMNS};
use crate::schema;

/// How long a writer waits for another connection's write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Relational store backed by SQLite
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database file and bring its schema up to date.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(path = %path.display(), journal_mode = %mode, "Opened database");
        Self::init(conn)
    }

    /// Private in-memory database (useful for tests)
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        schema::migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Run read-only work on the connection
    pub(crate) fn read<T>(
        &self,
        work: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = self.lock()?;
        work(&conn)
    }

    /// Run work in an immediate transaction; commit on `Ok`, roll back on `Err`
    pub(crate) fn write<T>(
        &self,
        work: impl FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let output = work(&tx)?;
        tx.commit()?;
        Ok(output)
    }
}

impl LikeStore for SqliteStore {
    fn atomically<T, F>(&self, work: F) -> Result<T, LikeError>
    where
        F: FnOnce(&mut dyn LikeLedger) -> Result<T, LikeError>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;

        // An early return drops `tx`, which rolls it back.
        let output = work(&mut SqliteLedger { conn: &tx })?;

        tx.commit().map_err(StoreError::from)?;
        Ok(output)
    }
}

fn ledger_err(err: rusqlite::Error) -> LikeError {
    StoreError::from(err).into()
}

struct SqliteLedger<'a> {
    conn: &'a Connection,
}

impl LikeLedger for SqliteLedger<'_> {
    fn user_exists(&mut self, user_id: UserId) -> Result<bool, LikeError> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
                params![user_id.get()],
                |row| row.get(0),
            )
            .map_err(ledger_err)
    }

    fn insert_like(&mut self, like: &NewLike, at: DateTime<Utc>) -> Result<Option<LikeId>, LikeError> {
        let inserted = self
            .conn
            .execute(
                "INSERT INTO likes (liker_id, liked_id, is_super_like, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (liker_id, liked_id) DO NOTHING",
                params![
                    like.liker_id.get(),
                    like.liked_id.get(),
                    like.is_super_like,
                    at
                ],
            )
            .map_err(ledger_err)?;

        Ok((inserted == 1).then(|| LikeId::new(self.conn.last_insert_rowid())))
    }

    fn find_like(&mut self, liker_id: UserId, liked_id: UserId) -> Result<Option<LikeId>, LikeError> {
        self.conn
            .query_row(
                "SELECT id FROM likes WHERE liker_id = ?1 AND liked_id = ?2",
                params![liker_id.get(), liked_id.get()],
                |row| row.get(0).map(LikeId::new),
            )
            .optional()
            .map_err(ledger_err)
    }

    fn insert_match_if_absent(
        &mut self,
        pair: MatchPair,
        at: DateTime<Utc>,
    ) -> Result<MatchInsert, LikeError> {
        let inserted = self
            .conn
            .execute(
                "INSERT INTO matches (user1_id, user2_id, is_active, matched_at)
                 VALUES (?1, ?2, 1, ?3)
                 ON CONFLICT (user1_id, user2_id) DO NOTHING",
                params![pair.low().get(), pair.high().get(), at],
            )
            .map_err(ledger_err)?;

        let stored = self.find_match(pair)?.ok_or_else(|| {
            LikeError::persistence(format!(
                "match row for users {} and {} missing after insert",
                pair.low(),
                pair.high()
            ))
        })?;

        Ok(if inserted == 1 {
            MatchInsert::Created(stored)
        } else {
            MatchInsert::Existing(stored)
        })
    }

    fn find_match(&mut self, pair: MatchPair) -> Result<Option<Match>, LikeError> {
        self.conn
            .query_row(
                &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE user1_id = ?1 AND user2_id = ?2"),
                params![pair.low().get(), pair.high().get()],
                match_from_row,
            )
            .optional()
            .map_err(ledger_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_on_disk_uses_wal() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("loveconnect.db");
        let store = SqliteStore::open(&path).unwrap();

        let mode: String = store
            .read(|conn| Ok(conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
        assert!(path.exists());
    }

    #[test]
    fn test_foreign_keys_enforced() {
        let store = SqliteStore::open_in_memory().unwrap();
        let result = store.write(|tx| {
            tx.execute(
                "INSERT INTO likes (liker_id, liked_id, created_at) VALUES (1, 2, '2024-01-01T00:00:00Z')",
                [],
            )?;
            Ok(())
        });
        assert!(matches!(result, Err(StoreError::Sqlite(_))));
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let store = SqliteStore::open_in_memory().unwrap();
        let result: Result<(), StoreError> = store.write(|tx| {
            tx.execute(
                "INSERT INTO gifts (name, icon, price_czk, price_eur, category)
                 VALUES ('Růže', '🌹', 10, '0.5', 'romantic')",
                [],
            )?;
            Err(StoreError::Conflict("forced".to_string()))
        });
        assert!(result.is_err());

        let count: i64 = store
            .read(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM gifts", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
    }
}
