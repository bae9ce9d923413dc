//! Match rows and per-user match listings

use rusqlite::{params, Connection, OptionalExtension, Row};
use types::ids::{MatchId, UserId};
use types::matches::{Match, MatchSummary};

use crate::error::StoreError;
use crate::store::SqliteStore;
use crate::users::{user_from_row_at, USER_COLUMNS};

pub(crate) const MATCH_COLUMNS: &str = "id, user1_id, user2_id, is_active, matched_at";

pub(crate) fn match_from_row(row: &Row<'_>) -> rusqlite::Result<Match> {
    Ok(Match {
        id: MatchId::new(row.get(0)?),
        user1_id: UserId::new(row.get(1)?),
        user2_id: UserId::new(row.get(2)?),
        is_active: row.get(3)?,
        matched_at: row.get(4)?,
    })
}

pub(crate) fn fetch_match(conn: &Connection, id: MatchId) -> Result<Option<Match>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1"),
            params![id.get()],
            match_from_row,
        )
        .optional()?)
}

impl SqliteStore {
    pub fn get_match(&self, id: MatchId) -> Result<Option<Match>, StoreError> {
        self.read(|conn| fetch_match(conn, id))
    }

    /// Active matches of `user_id`, newest first, each with the partner's profile
    pub fn list_matches(&self, user_id: UserId) -> Result<Vec<MatchSummary>, StoreError> {
        let partner_columns = USER_COLUMNS
            .split(", ")
            .map(|column| format!("u.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT m.id, m.matched_at, {partner_columns}
             FROM matches m
             JOIN users u
               ON u.id = CASE WHEN m.user1_id = ?1 THEN m.user2_id ELSE m.user1_id END
             WHERE (m.user1_id = ?1 OR m.user2_id = ?1) AND m.is_active = 1
             ORDER BY m.matched_at DESC, m.id DESC"
        );

        self.read(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let summaries = stmt
                .query_map(params![user_id.get()], |row| {
                    Ok(MatchSummary {
                        match_id: MatchId::new(row.get(0)?),
                        matched_at: row.get(1)?,
                        partner: user_from_row_at(row, 2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(summaries)
        })
    }
}
