use crate::error::AppError;
use crate::rate_limit::RateLimiter;
use match_engine::{MatchCreatedEvent, MatchEngine};
use persistence::{SqliteStore, StoreError};
use std::sync::Arc;
use tokio::sync::broadcast;
use types::errors::LikeError;

/// Buffered match notifications per subscriber before it starts lagging
const MATCH_EVENT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SqliteStore>,
    pub engine: MatchEngine<Arc<SqliteStore>>,
    pub rate_limiter: Arc<RateLimiter>,
    pub jwt_secret: Arc<str>,
    pub match_events: broadcast::Sender<MatchCreatedEvent>,
}

impl AppState {
    pub fn new(store: Arc<SqliteStore>, jwt_secret: &str) -> Self {
        let (match_events, _) = broadcast::channel(MATCH_EVENT_CAPACITY);
        Self {
            engine: MatchEngine::new(Arc::clone(&store)),
            store,
            rate_limiter: Arc::new(RateLimiter::new()),
            jwt_secret: Arc::from(jwt_secret),
            match_events,
        }
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = Arc::new(rate_limiter);
        self
    }

    /// Run blocking store work off the async runtime
    pub async fn run_store<T, F>(&self, work: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&SqliteStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || work(&store))
            .await
            .map_err(anyhow::Error::from)?;
        Ok(result?)
    }

    /// Run blocking match engine work off the async runtime
    pub async fn run_engine<T, F>(&self, work: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&MatchEngine<Arc<SqliteStore>>) -> Result<T, LikeError> + Send + 'static,
    {
        let engine = self.engine.clone();
        let result = tokio::task::spawn_blocking(move || work(&engine))
            .await
            .map_err(anyhow::Error::from)?;
        Ok(result?)
    }

    /// Publish a new match. Having no subscribers is not an error.
    pub fn publish_match(&self, event: MatchCreatedEvent) {
        let receivers = self.match_events.send(event).unwrap_or(0);
        tracing::debug!(receivers, "Match event published");
    }
}
