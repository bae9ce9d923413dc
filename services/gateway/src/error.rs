use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use persistence::StoreError;
use serde_json::json;
use thiserror::Error;
use types::errors::{LikeError, ValidationError};

/// Central error type for the Gateway application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already liked: {0}")]
    AlreadyLiked(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<LikeError> for AppError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::SelfLike => AppError::BadRequest(err.to_string()),
            LikeError::UnknownUser { .. } => AppError::NotFound(err.to_string()),
            LikeError::DuplicateLike { .. } => AppError::AlreadyLiked(err.to_string()),
            LikeError::Persistence { .. } => AppError::InternalError(anyhow::Error::new(err)),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => e.into(),
            StoreError::NotFound { .. } => AppError::NotFound(err.to_string()),
            StoreError::Conflict(_) | StoreError::InactiveMatch { .. } => {
                AppError::Conflict(err.to_string())
            }
            StoreError::NotParticipant { .. } => AppError::Forbidden(err.to_string()),
            other => AppError::InternalError(anyhow::Error::new(other)),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, code) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, "UNAUTHORIZED"),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, "FORBIDDEN"),
            AppError::RateLimitExceeded(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, msg, "RATE_LIMIT_EXCEEDED")
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            AppError::AlreadyLiked(msg) => (StatusCode::CONFLICT, msg, "ALREADY_LIKED"),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg, "CONFLICT"),
            AppError::InternalError(err) => {
                tracing::error!(error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    "INTERNAL_ERROR",
                )
            }
        };

        let body = Json(json!({
            "error": code,
            "message": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{MatchId, UserId};

    fn status_of(err: impl Into<AppError>) -> StatusCode {
        err.into().into_response().status()
    }

    #[test]
    fn test_like_error_statuses() {
        assert_eq!(status_of(LikeError::SelfLike), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(LikeError::UnknownUser {
                user_id: UserId::new(9)
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(LikeError::DuplicateLike {
                liker_id: UserId::new(1),
                liked_id: UserId::new(2)
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(LikeError::persistence("disk full")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_statuses() {
        assert_eq!(
            status_of(StoreError::Validation(ValidationError::EmptyName)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(StoreError::NotParticipant {
                match_id: MatchId::new(1),
                user_id: UserId::new(3)
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(StoreError::InactiveMatch {
                match_id: MatchId::new(1)
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(StoreError::Poisoned), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
