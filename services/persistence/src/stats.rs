//! Aggregate counters

use serde::Serialize;

use crate::error::StoreError;
use crate::store::SqliteStore;

/// Point-in-time counts across the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
    pub users: i64,
    pub active_matches: i64,
    pub messages: i64,
    pub gifts_sent: i64,
}

impl SqliteStore {
    pub fn stats(&self) -> Result<Stats, StoreError> {
        self.read(|conn| {
            Ok(conn.query_row(
                "SELECT
                     (SELECT COUNT(*) FROM users),
                     (SELECT COUNT(*) FROM matches WHERE is_active = 1),
                     (SELECT COUNT(*) FROM messages),
                     (SELECT COUNT(*) FROM gift_transactions)",
                [],
                |row| {
                    Ok(Stats {
                        users: row.get(0)?,
                        active_matches: row.get(1)?,
                        messages: row.get(2)?,
                        gifts_sent: row.get(3)?,
                    })
                },
            )?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_stats() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.stats().unwrap(), Stats::default());
    }

    #[test]
    fn test_stats_after_seed() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.seed_sample_data().unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.users, 5);
        assert_eq!(stats.active_matches, 0);
        assert_eq!(stats.gifts_sent, 0);
    }
}
