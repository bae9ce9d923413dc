//! Chat inside a match

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::debug;
use types::ids::{MatchId, MessageId, UserId};
use types::matches::Match;
use types::message::{validate_message_text, Message, MessageView};

use crate::error::StoreError;
use crate::matches::fetch_match;
use crate::store::SqliteStore;

const MESSAGE_COLUMNS: &str =
    "msg.id, msg.match_id, msg.sender_id, msg.message_text, msg.sent_at, u.name";

fn view_from_row(row: &Row<'_>) -> rusqlite::Result<MessageView> {
    Ok(MessageView {
        message: Message {
            id: MessageId::new(row.get(0)?),
            match_id: MatchId::new(row.get(1)?),
            sender_id: UserId::new(row.get(2)?),
            message_text: row.get(3)?,
            sent_at: row.get(4)?,
        },
        sender_name: row.get(5)?,
    })
}

/// Load the match and make sure `user_id` is one of its two participants
fn participant_match(
    conn: &Connection,
    match_id: MatchId,
    user_id: UserId,
) -> Result<Match, StoreError> {
    let stored =
        fetch_match(conn, match_id)?.ok_or_else(|| StoreError::not_found("match", match_id.get()))?;
    if !stored.involves(user_id) {
        return Err(StoreError::NotParticipant { match_id, user_id });
    }
    Ok(stored)
}

impl SqliteStore {
    /// Post a message to an active match the sender takes part in
    pub fn send_message(
        &self,
        match_id: MatchId,
        sender_id: UserId,
        text: &str,
    ) -> Result<MessageView, StoreError> {
        let text = validate_message_text(text)?;

        let view = self.write(|tx| {
            let stored = participant_match(tx, match_id, sender_id)?;
            if !stored.is_active {
                return Err(StoreError::InactiveMatch { match_id });
            }

            tx.execute(
                "INSERT INTO messages (match_id, sender_id, message_text, sent_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![match_id.get(), sender_id.get(), text, Utc::now()],
            )?;
            let id = tx.last_insert_rowid();
            Ok(tx.query_row(
                &format!(
                    "SELECT {MESSAGE_COLUMNS}
                     FROM messages msg JOIN users u ON u.id = msg.sender_id
                     WHERE msg.id = ?1"
                ),
                params![id],
                view_from_row,
            )?)
        })?;

        debug!(match_id = %match_id, sender = %sender_id, message_id = %view.message.id, "Message sent");
        Ok(view)
    }

    /// Conversation history, oldest first. Only participants may read it;
    /// history stays readable after a match goes inactive.
    pub fn list_messages(
        &self,
        match_id: MatchId,
        viewer_id: UserId,
    ) -> Result<Vec<MessageView>, StoreError> {
        self.read(|conn| {
            participant_match(conn, match_id, viewer_id)?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS}
                 FROM messages msg JOIN users u ON u.id = msg.sender_id
                 WHERE msg.match_id = ?1
                 ORDER BY msg.sent_at, msg.id"
            ))?;
            let views = stmt
                .query_map(params![match_id.get()], view_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(views)
        })
    }
}
