//! User profile and photo types
//!
//! Profiles carry an immutable `created_at` and a mutable set of attributes.
//! Incoming profile data goes through `validated()` before it is stored.

use crate::errors::ValidationError;
use crate::ids::{PhotoId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_AGE: u32 = 18;
pub const MAX_AGE: u32 = 120;

/// Results returned by a search when the caller gives no limit
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Stored user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub age: u32,
    /// Lower-case ISO 3166 alpha-2 code, e.g. "cz"
    pub country: String,
    pub bio: String,
    pub verified: bool,
    pub premium: bool,
    pub distance_km: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile data for a user that does not exist yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub age: u32,
    pub country: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub premium: bool,
    #[serde(default)]
    pub distance_km: u32,
}

impl NewUser {
    /// Check and normalize the profile: trims the name and bio, lower-cases
    /// the country and email.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = validate_name(&self.name)?;
        validate_age(self.age)?;
        self.country = normalize_country(&self.country)?;
        self.email = self.email.as_deref().map(normalize_email).transpose()?;
        self.bio = self.bio.trim().to_string();
        Ok(self)
    }
}

/// Partial profile update. `None` leaves the attribute untouched.
///
/// Verification and premium status are not user-editable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub distance_km: Option<u32>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.country.is_none()
            && self.bio.is_none()
            && self.distance_km.is_none()
    }

    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.name = self.name.as_deref().map(validate_name).transpose()?;
        if let Some(age) = self.age {
            validate_age(age)?;
        }
        self.country = self.country.as_deref().map(normalize_country).transpose()?;
        self.bio = self.bio.map(|bio| bio.trim().to_string());
        Ok(self)
    }
}

/// Profile search filters. Every filter is optional and a blank value
/// (`?min_age=`) counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSearch {
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_age: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_age: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_distance_km: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_false")]
    pub verified_only: bool,
    #[serde(default, deserialize_with = "blank_as_false")]
    pub premium_only: bool,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<u32>,
}

impl UserSearch {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.country = country_filter(self.country.as_deref())?;
        if let (Some(min), Some(max)) = (self.min_age, self.max_age) {
            if min > max {
                return Err(ValidationError::EmptyAgeRange { min, max });
            }
        }
        let limit = self.effective_limit();
        if limit == 0 || limit > MAX_SEARCH_LIMIT {
            return Err(ValidationError::InvalidLimit {
                limit,
                max: MAX_SEARCH_LIMIT,
            });
        }
        Ok(self)
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}

/// Profile photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub user_id: UserId,
    pub photo_url: String,
    pub is_primary: bool,
    pub order_index: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhoto {
    pub photo_url: String,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub order_index: u32,
}

impl NewPhoto {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.photo_url = self.photo_url.trim().to_string();
        if self.photo_url.is_empty() {
            return Err(ValidationError::EmptyPhotoUrl);
        }
        Ok(self)
    }
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn validate_age(age: u32) -> Result<(), ValidationError> {
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(ValidationError::AgeOutOfRange {
            age,
            min: MIN_AGE,
            max: MAX_AGE,
        });
    }
    Ok(())
}

/// Two ASCII letters, stored lower-case
pub fn normalize_country(country: &str) -> Result<String, ValidationError> {
    let code = country.trim();
    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidCountry {
            country: country.to_string(),
        });
    }
    Ok(code.to_ascii_lowercase())
}

/// Optional country filter; blank input means no filter
pub fn country_filter(country: Option<&str>) -> Result<Option<String>, ValidationError> {
    country
        .filter(|code| !code.trim().is_empty())
        .map(normalize_country)
        .transpose()
}

/// Query strings deliver every value as text while JSON bodies carry
/// numbers and booleans natively; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum FilterValue<T> {
    Native(T),
    Text(String),
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FilterValue<u32>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FilterValue::Native(value)) => Ok(Some(value)),
        Some(FilterValue::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(FilterValue::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected a whole number, got {text:?}"))),
    }
}

fn blank_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FilterValue<bool>>::deserialize(deserializer)? {
        None => Ok(false),
        Some(FilterValue::Native(value)) => Ok(value),
        Some(FilterValue::Text(text)) => match text.trim() {
            "" | "false" | "0" => Ok(false),
            "true" | "1" => Ok(true),
            _ => Err(serde::de::Error::custom(format!(
                "expected true or false, got {text:?}"
            ))),
        },
    }
}

fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ValidationError::InvalidEmail { email }),
    }
}
