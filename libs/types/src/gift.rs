//! Virtual gift catalog and gift transactions
//!
//! Prices are catalog data only. Currency conversion and payment are handled
//! outside this system.

use crate::errors::ValidationError;
use crate::ids::{GiftId, GiftTransactionId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GiftCategory {
    Romantic,
    Lucky,
    Luxury,
    Sweet,
}

impl GiftCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            GiftCategory::Romantic => "romantic",
            GiftCategory::Lucky => "lucky",
            GiftCategory::Luxury => "luxury",
            GiftCategory::Sweet => "sweet",
        }
    }
}

impl fmt::Display for GiftCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GiftCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "romantic" => Ok(GiftCategory::Romantic),
            "lucky" => Ok(GiftCategory::Lucky),
            "luxury" => Ok(GiftCategory::Luxury),
            "sweet" => Ok(GiftCategory::Sweet),
            other => Err(format!("unknown gift category: {other}")),
        }
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gift {
    pub id: GiftId,
    pub name: String,
    pub icon: String,
    pub price_czk: i64,
    pub price_eur: Decimal,
    pub category: GiftCategory,
}

/// A gift sent from one user to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftTransaction {
    pub id: GiftTransactionId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub gift_id: GiftId,
    pub message: Option<String>,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGiftTransaction {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub gift_id: GiftId,
    #[serde(default)]
    pub message: Option<String>,
}

impl NewGiftTransaction {
    /// Rejects self-gifts and drops a blank note
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        if self.sender_id == self.receiver_id {
            return Err(ValidationError::SelfGift);
        }
        self.message = self
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        Ok(self)
    }
}
