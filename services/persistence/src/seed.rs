//! Sample profiles and the gift catalog for a fresh database

use chrono::Utc;
use rusqlite::params;
use rust_decimal::Decimal;
use tracing::info;
use types::gift::GiftCategory;

use crate::error::StoreError;
use crate::gifts::insert_gift;
use crate::store::SqliteStore;

/// (name, age, country, bio, verified, premium, distance_km)
const SAMPLE_USERS: [(&str, u32, &str, &str, bool, bool, u32); 5] = [
    ("Tereza", 24, "cz", "Miluji cestování a dobrou kávu ☕", true, false, 5),
    ("Klára", 26, "cz", "Fotografka a milovnice přírody 📸", true, true, 12),
    ("Anička", 23, "cz", "Studentka medicíny 👩‍⚕️", true, false, 8),
    ("Veronika", 27, "cz", "Učitelka na základní škole 👩‍🏫", false, false, 18),
    ("Nikola", 25, "cz", "Grafická designérka 🎨", true, true, 22),
];

/// (name, icon, price in CZK, price in euro cents, category)
const SAMPLE_GIFTS: [(&str, &str, i64, i64, GiftCategory); 6] = [
    ("Růže", "🌹", 10, 50, GiftCategory::Romantic),
    ("Čtyřlístek", "🍀", 15, 60, GiftCategory::Lucky),
    ("Srdce", "💖", 30, 120, GiftCategory::Romantic),
    ("Šampáňo", "🥂", 50, 200, GiftCategory::Luxury),
    ("Čokoláda", "🍫", 25, 100, GiftCategory::Sweet),
    ("Diamant", "💎", 200, 800, GiftCategory::Luxury),
];

/// Rows added by one seeding run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub users: usize,
    pub gifts: usize,
}

impl SqliteStore {
    /// Insert the sample data. Users are added only into an empty `users`
    /// table; gifts are keyed by name. Running it again adds nothing.
    pub fn seed_sample_data(&self) -> Result<SeedReport, StoreError> {
        let report = self.write(|tx| {
            let mut report = SeedReport::default();

            let existing: i64 = tx.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            if existing == 0 {
                let now = Utc::now();
                for (name, age, country, bio, verified, premium, distance_km) in SAMPLE_USERS {
                    tx.execute(
                        "INSERT INTO users
                             (name, age, country, bio, verified, premium, distance_km, created_at, updated_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                        params![name, age, country, bio, verified, premium, distance_km, now],
                    )?;
                    report.users += 1;
                }
            }

            for (name, icon, price_czk, eur_cents, category) in SAMPLE_GIFTS {
                let price_eur = Decimal::new(eur_cents, 2).normalize();
                if insert_gift(tx, name, icon, price_czk, price_eur, category)? {
                    report.gifts += 1;
                }
            }
            Ok(report)
        })?;

        info!(users = report.users, gifts = report.gifts, "Sample data seeded");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();

        let first = store.seed_sample_data().unwrap();
        assert_eq!(first, SeedReport { users: 5, gifts: 6 });

        let second = store.seed_sample_data().unwrap();
        assert_eq!(second, SeedReport::default());
        assert_eq!(store.list_users(None).unwrap().len(), 5);
        assert_eq!(store.list_gifts().unwrap().len(), 6);
    }

    #[test]
    fn test_seeded_catalog_prices() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.seed_sample_data().unwrap();

        let gifts = store.list_gifts().unwrap();
        let diamond = gifts.iter().find(|g| g.name == "Diamant").unwrap();
        assert_eq!(diamond.price_czk, 200);
        assert_eq!(diamond.price_eur, Decimal::new(8, 0));
        assert_eq!(diamond.price_eur.to_string(), "8");

        let rose = gifts.iter().find(|g| g.name == "Růže").unwrap();
        assert_eq!(rose.price_eur.to_string(), "0.5");
    }

    #[test]
    fn test_seed_keeps_existing_profiles() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .create_user(types::user::NewUser {
                name: "Jana".to_string(),
                email: None,
                age: 30,
                country: "sk".to_string(),
                bio: String::new(),
                verified: false,
                premium: false,
                distance_km: 40,
            })
            .unwrap();

        let report = store.seed_sample_data().unwrap();
        assert_eq!(report.users, 0);
        assert_eq!(store.list_users(None).unwrap().len(), 1);
    }
}
