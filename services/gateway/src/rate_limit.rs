use crate::error::AppError;
use dashmap::DashMap;
use std::time::Instant;
use types::ids::UserId;

/// Rate-limited operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Like,
    Message,
    GiftSend,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Like => "like",
            Action::Message => "message",
            Action::GiftSend => "gift_send",
        }
    }
}

/// Burst size and sustained rate of one bucket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quota {
    pub capacity: u32,
    pub refill_per_sec: f64,
}

impl Quota {
    pub const fn new(capacity: u32, refill_per_sec: f64) -> Self {
        Self {
            capacity,
            refill_per_sec,
        }
    }

    fn default_for(action: Action) -> Self {
        match action {
            Action::Like => Quota::new(60, 1.0),
            Action::Message => Quota::new(30, 1.0),
            Action::GiftSend => Quota::new(10, 0.2),
        }
    }
}

#[derive(Clone)]
struct Bucket {
    capacity: u32,
    tokens: f64,
    refill_rate: f64,
    last_update: Instant,
}

impl Bucket {
    fn new(quota: Quota) -> Self {
        Self {
            capacity: quota.capacity,
            tokens: quota.capacity as f64,
            refill_rate: quota.refill_per_sec,
            last_update: Instant::now(),
        }
    }

    fn allow_request(&mut self, tokens: u32) -> bool {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update).as_secs_f64();

        self.tokens = f64::min(
            self.capacity as f64,
            self.tokens + elapsed * self.refill_rate,
        );
        self.last_update = now;

        if self.tokens >= tokens as f64 {
            self.tokens -= tokens as f64;
            true
        } else {
            false
        }
    }
}

/// Token buckets keyed by (user, action)
pub struct RateLimiter {
    buckets: DashMap<(UserId, Action), Bucket>,
    quotas: DashMap<Action, Quota>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
            quotas: DashMap::new(),
        }
    }

    /// Override the quota of one action. Buckets created earlier keep theirs.
    pub fn with_quota(self, action: Action, quota: Quota) -> Self {
        self.quotas.insert(action, quota);
        self
    }

    fn quota(&self, action: Action) -> Quota {
        self.quotas
            .get(&action)
            .map(|q| *q)
            .unwrap_or_else(|| Quota::default_for(action))
    }

    pub fn check_rate_limit(&self, user_id: UserId, action: Action) -> Result<(), AppError> {
        let quota = self.quota(action);
        let mut bucket = self
            .buckets
            .entry((user_id, action))
            .or_insert_with(|| Bucket::new(quota));

        if bucket.allow_request(1) {
            Ok(())
        } else {
            tracing::warn!(user_id = %user_id, action = action.as_str(), "Rate limit hit");
            Err(AppError::RateLimitExceeded(format!(
                "Too many {} requests",
                action.as_str()
            )))
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
