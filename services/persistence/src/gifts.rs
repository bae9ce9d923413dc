//! Gift catalog and gift transactions
//!
//! EUR prices are stored as decimal strings so they round-trip exactly.

use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::info;
use types::gift::{Gift, GiftCategory, GiftTransaction, NewGiftTransaction};
use types::ids::{GiftId, GiftTransactionId, UserId};

use crate::error::StoreError;
use crate::store::SqliteStore;
use crate::users::require_user;

const GIFT_COLUMNS: &str = "id, name, icon, price_czk, price_eur, category";
const TRANSACTION_COLUMNS: &str = "id, sender_id, receiver_id, gift_id, message, sent_at";

fn conversion_failure(
    column: usize,
    err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, err.into())
}

fn gift_from_row(row: &Row<'_>) -> rusqlite::Result<Gift> {
    let price_eur: String = row.get(4)?;
    let category: String = row.get(5)?;
    Ok(Gift {
        id: GiftId::new(row.get(0)?),
        name: row.get(1)?,
        icon: row.get(2)?,
        price_czk: row.get(3)?,
        price_eur: Decimal::from_str(&price_eur).map_err(|e| conversion_failure(4, e))?,
        category: category.parse().map_err(|e: String| conversion_failure(5, e))?,
    })
}

fn transaction_from_row(row: &Row<'_>) -> rusqlite::Result<GiftTransaction> {
    Ok(GiftTransaction {
        id: GiftTransactionId::new(row.get(0)?),
        sender_id: UserId::new(row.get(1)?),
        receiver_id: UserId::new(row.get(2)?),
        gift_id: GiftId::new(row.get(3)?),
        message: row.get(4)?,
        sent_at: row.get(5)?,
    })
}

fn fetch_gift(conn: &Connection, id: GiftId) -> Result<Option<Gift>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {GIFT_COLUMNS} FROM gifts WHERE id = ?1"),
            params![id.get()],
            gift_from_row,
        )
        .optional()?)
}

/// Insert a catalog entry unless one with the same name exists.
///
/// Returns true when a row was added.
pub(crate) fn insert_gift(
    conn: &Connection,
    name: &str,
    icon: &str,
    price_czk: i64,
    price_eur: Decimal,
    category: GiftCategory,
) -> Result<bool, StoreError> {
    let inserted = conn.execute(
        "INSERT INTO gifts (name, icon, price_czk, price_eur, category)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (name) DO NOTHING",
        params![name, icon, price_czk, price_eur.to_string(), category.as_str()],
    )?;
    Ok(inserted == 1)
}

impl SqliteStore {
    /// Whole catalog, cheapest first
    pub fn list_gifts(&self) -> Result<Vec<Gift>, StoreError> {
        self.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {GIFT_COLUMNS} FROM gifts ORDER BY price_czk, id"
            ))?;
            let gifts = stmt
                .query_map([], gift_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(gifts)
        })
    }

    pub fn get_gift(&self, id: GiftId) -> Result<Option<Gift>, StoreError> {
        self.read(|conn| fetch_gift(conn, id))
    }

    /// Record a gift. Sender, receiver and gift must all exist.
    pub fn send_gift(&self, gift: NewGiftTransaction) -> Result<GiftTransaction, StoreError> {
        let gift = gift.validated()?;

        let sent = self.write(|tx| {
            require_user(tx, gift.sender_id)?;
            require_user(tx, gift.receiver_id)?;
            if fetch_gift(tx, gift.gift_id)?.is_none() {
                return Err(StoreError::not_found("gift", gift.gift_id.get()));
            }

            tx.execute(
                "INSERT INTO gift_transactions (sender_id, receiver_id, gift_id, message, sent_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    gift.sender_id.get(),
                    gift.receiver_id.get(),
                    gift.gift_id.get(),
                    gift.message,
                    Utc::now(),
                ],
            )?;
            let id = tx.last_insert_rowid();
            Ok(tx.query_row(
                &format!("SELECT {TRANSACTION_COLUMNS} FROM gift_transactions WHERE id = ?1"),
                params![id],
                transaction_from_row,
            )?)
        })?;

        info!(
            sender = %sent.sender_id,
            receiver = %sent.receiver_id,
            gift_id = %sent.gift_id,
            "Gift sent"
        );
        Ok(sent)
    }

    /// Gifts sent or received by `user_id`, newest first
    pub fn list_gift_transactions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<GiftTransaction>, StoreError> {
        self.read(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM gift_transactions
                 WHERE sender_id = ?1 OR receiver_id = ?1
                 ORDER BY sent_at DESC, id DESC"
            ))?;
            let sent = stmt
                .query_map(params![user_id.get()], transaction_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(sent)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::errors::ValidationError;
    use types::user::NewUser;

    fn store_with_catalog() -> (SqliteStore, UserId, UserId, GiftId) {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut users = ["Tereza", "Klára"].into_iter().map(|name| {
            store
                .create_user(NewUser {
                    name: name.to_string(),
                    email: None,
                    age: 24,
                    country: "cz".to_string(),
                    bio: String::new(),
                    verified: false,
                    premium: false,
                    distance_km: 5,
                })
                .unwrap()
                .id
        });
        let (sender, receiver) = (users.next().unwrap(), users.next().unwrap());

        store
            .write(|tx| {
                insert_gift(tx, "Růže", "🌹", 10, Decimal::new(5, 1), GiftCategory::Romantic)?;
                insert_gift(tx, "Diamant", "💎", 200, Decimal::new(8, 0), GiftCategory::Luxury)
            })
            .unwrap();
        let rose = store.list_gifts().unwrap()[0].id;
        (store, sender, receiver, rose)
    }

    #[test]
    fn test_catalog_round_trips_prices() {
        let (store, _, _, rose) = store_with_catalog();

        let gifts = store.list_gifts().unwrap();
        assert_eq!(gifts.len(), 2);
        assert_eq!(gifts[0].name, "Růže");
        assert_eq!(gifts[0].price_eur, Decimal::new(5, 1));
        assert_eq!(gifts[1].category, GiftCategory::Luxury);

        assert_eq!(store.get_gift(rose).unwrap().unwrap().icon, "🌹");
        assert!(store.get_gift(GiftId::new(99)).unwrap().is_none());
    }

    #[test]
    fn test_catalog_names_unique() {
        let (store, _, _, _) = store_with_catalog();
        let added = store
            .write(|tx| insert_gift(tx, "Růže", "🌹", 12, Decimal::new(6, 1), GiftCategory::Romantic))
            .unwrap();
        assert!(!added);
        assert_eq!(store.list_gifts().unwrap().len(), 2);
    }

    #[test]
    fn test_send_gift() {
        let (store, sender, receiver, rose) = store_with_catalog();

        let sent = store
            .send_gift(NewGiftTransaction {
                sender_id: sender,
                receiver_id: receiver,
                gift_id: rose,
                message: Some(" Pro tebe ".to_string()),
            })
            .unwrap();
        assert_eq!(sent.message.as_deref(), Some("Pro tebe"));

        assert_eq!(store.list_gift_transactions(sender).unwrap(), vec![sent.clone()]);
        assert_eq!(store.list_gift_transactions(receiver).unwrap(), vec![sent]);
    }

    #[test]
    fn test_send_gift_checks_references() {
        let (store, sender, receiver, rose) = store_with_catalog();

        let err = store
            .send_gift(NewGiftTransaction {
                sender_id: sender,
                receiver_id: UserId::new(404),
                gift_id: rose,
                message: None,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "user", id: 404 }));

        let err = store
            .send_gift(NewGiftTransaction {
                sender_id: sender,
                receiver_id: receiver,
                gift_id: GiftId::new(77),
                message: None,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "gift", id: 77 }));

        let err = store
            .send_gift(NewGiftTransaction {
                sender_id: sender,
                receiver_id: sender,
                gift_id: rose,
                message: None,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(ValidationError::SelfGift)));

        assert!(store.list_gift_transactions(sender).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_price_reported() {
        let (store, _, _, rose) = store_with_catalog();
        store
            .write(|tx| {
                Ok(tx.execute(
                    "UPDATE gifts SET price_eur = 'lots' WHERE id = ?1",
                    params![rose.get()],
                )?)
            })
            .unwrap();

        assert!(matches!(store.get_gift(rose), Err(StoreError::Sqlite(_))));
    }
}
