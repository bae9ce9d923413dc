//! Profiles and photos

use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use tracing::info;
use types::ids::{PhotoId, UserId};
use types::user::{country_filter, NewPhoto, NewUser, Photo, User, UserSearch, UserUpdate};

use crate::error::StoreError;
use crate::store::SqliteStore;

pub(crate) const USER_COLUMNS: &str =
    "id, name, email, age, country, bio, verified, premium, distance_km, created_at, updated_at";

/// Map a row whose user columns start at `offset`, in `USER_COLUMNS` order
pub(crate) fn user_from_row_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId::new(row.get(offset)?),
        name: row.get(offset + 1)?,
        email: row.get(offset + 2)?,
        age: row.get(offset + 3)?,
        country: row.get(offset + 4)?,
        bio: row.get(offset + 5)?,
        verified: row.get(offset + 6)?,
        premium: row.get(offset + 7)?,
        distance_km: row.get(offset + 8)?,
        created_at: row.get(offset + 9)?,
        updated_at: row.get(offset + 10)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    user_from_row_at(row, 0)
}

fn photo_from_row(row: &Row<'_>) -> rusqlite::Result<Photo> {
    Ok(Photo {
        id: PhotoId::new(row.get(0)?),
        user_id: UserId::new(row.get(1)?),
        photo_url: row.get(2)?,
        is_primary: row.get(3)?,
        order_index: row.get(4)?,
        created_at: row.get(5)?,
    })
}

pub(crate) fn fetch_user(conn: &Connection, id: UserId) -> Result<Option<User>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.get()],
            user_from_row,
        )
        .optional()?)
}

pub(crate) fn require_user(conn: &Connection, id: UserId) -> Result<User, StoreError> {
    fetch_user(conn, id)?.ok_or_else(|| StoreError::not_found("user", id.get()))
}

fn query_users(
    conn: &Connection,
    sql: &str,
    values: &[Box<dyn ToSql>],
) -> Result<Vec<User>, StoreError> {
    let mut stmt = conn.prepare(sql)?;
    let users = stmt
        .query_map(params_from_iter(values.iter()), user_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

impl SqliteStore {
    pub fn create_user(&self, new_user: NewUser) -> Result<User, StoreError> {
        self.create_user_at(new_user, Utc::now())
    }

    /// Validate and insert a profile. Emails are unique across users.
    pub fn create_user_at(&self, new_user: NewUser, at: DateTime<Utc>) -> Result<User, StoreError> {
        let new_user = new_user.validated()?;

        let user = self.write(|tx| {
            if let Some(email) = &new_user.email {
                let taken: bool = tx.query_row(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?1)",
                    params![email],
                    |row| row.get(0),
                )?;
                if taken {
                    return Err(StoreError::Conflict(format!(
                        "email {email} is already registered"
                    )));
                }
            }

            tx.execute(
                "INSERT INTO users
                     (name, email, age, country, bio, verified, premium, distance_km, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
                params![
                    new_user.name,
                    new_user.email,
                    new_user.age,
                    new_user.country,
                    new_user.bio,
                    new_user.verified,
                    new_user.premium,
                    new_user.distance_km,
                    at,
                ],
            )?;
            require_user(tx, UserId::new(tx.last_insert_rowid()))
        })?;

        info!(user_id = %user.id, country = %user.country, "User created");
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.read(|conn| fetch_user(conn, id))
    }

    /// All users, optionally restricted to one country. A blank country
    /// lists everyone.
    pub fn list_users(&self, country: Option<&str>) -> Result<Vec<User>, StoreError> {
        let country = country_filter(country)?;
        let mut sql = format!("SELECT {USER_COLUMNS} FROM users");
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(country) = country {
            sql.push_str(" WHERE country = ?");
            values.push(Box::new(country));
        }
        sql.push_str(" ORDER BY id");

        self.read(|conn| query_users(conn, &sql, &values))
    }

    /// Filtered profile search, at most `effective_limit()` results
    pub fn search_users(&self, search: UserSearch) -> Result<Vec<User>, StoreError> {
        let search = search.validated()?;

        let mut sql = format!("SELECT {USER_COLUMNS} FROM users WHERE 1 = 1");
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(country) = search.country.clone() {
            sql.push_str(" AND country = ?");
            values.push(Box::new(country));
        }
        if let Some(min_age) = search.min_age {
            sql.push_str(" AND age >= ?");
            values.push(Box::new(min_age));
        }
        if let Some(max_age) = search.max_age {
            sql.push_str(" AND age <= ?");
            values.push(Box::new(max_age));
        }
        if let Some(max_distance) = search.max_distance_km {
            sql.push_str(" AND distance_km <= ?");
            values.push(Box::new(max_distance));
        }
        if search.verified_only {
            sql.push_str(" AND verified = 1");
        }
        if search.premium_only {
            sql.push_str(" AND premium = 1");
        }
        sql.push_str(" ORDER BY distance_km, id LIMIT ?");
        values.push(Box::new(search.effective_limit()));

        self.read(|conn| query_users(conn, &sql, &values))
    }

    /// Apply a partial update and bump `updated_at`. An empty update returns
    /// the stored profile untouched.
    pub fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, StoreError> {
        let update = update.validated()?;
        if update.is_empty() {
            return self.read(|conn| require_user(conn, id));
        }

        let mut assignments: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = update.name {
            assignments.push("name = ?");
            values.push(Box::new(name));
        }
        if let Some(age) = update.age {
            assignments.push("age = ?");
            values.push(Box::new(age));
        }
        if let Some(country) = update.country {
            assignments.push("country = ?");
            values.push(Box::new(country));
        }
        if let Some(bio) = update.bio {
            assignments.push("bio = ?");
            values.push(Box::new(bio));
        }
        if let Some(distance_km) = update.distance_km {
            assignments.push("distance_km = ?");
            values.push(Box::new(distance_km));
        }
        assignments.push("updated_at = ?");
        values.push(Box::new(Utc::now()));
        values.push(Box::new(id.get()));

        let sql = format!("UPDATE users SET {} WHERE id = ?", assignments.join(", "));

        self.write(|tx| {
            let changed = tx.execute(&sql, params_from_iter(values.iter()))?;
            if changed == 0 {
                return Err(StoreError::not_found("user", id.get()));
            }
            require_user(tx, id)
        })
    }

    /// Delete a profile; likes, matches, messages, photos and gifts cascade.
    ///
    /// Returns false when no such user existed.
    pub fn delete_user(&self, id: UserId) -> Result<bool, StoreError> {
        let deleted = self.write(|tx| Ok(tx.execute("DELETE FROM users WHERE id = ?1", params![id.get()])?))?;
        if deleted > 0 {
            info!(user_id = %id, "User deleted");
        }
        Ok(deleted > 0)
    }

    pub fn add_photo(&self, user_id: UserId, photo: NewPhoto) -> Result<Photo, StoreError> {
        let photo = photo.validated()?;

        self.write(|tx| {
            require_user(tx, user_id)?;
            if photo.is_primary {
                tx.execute(
                    "UPDATE photos SET is_primary = 0 WHERE user_id = ?1",
                    params![user_id.get()],
                )?;
            }
            tx.execute(
                "INSERT INTO photos (user_id, photo_url, is_primary, order_index, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user_id.get(),
                    photo.photo_url,
                    photo.is_primary,
                    photo.order_index,
                    Utc::now(),
                ],
            )?;
            let id = tx.last_insert_rowid();
            Ok(tx.query_row(
                "SELECT id, user_id, photo_url, is_primary, order_index, created_at
                 FROM photos WHERE id = ?1",
                params![id],
                photo_from_row,
            )?)
        })
    }

    /// Photos in display order
    pub fn list_photos(&self, user_id: UserId) -> Result<Vec<Photo>, StoreError> {
        self.read(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, photo_url, is_primary, order_index, created_at
                 FROM photos WHERE user_id = ?1 ORDER BY order_index, id",
            )?;
            let photos = stmt
                .query_map(params![user_id.get()], photo_from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(photos)
        })
    }
}
