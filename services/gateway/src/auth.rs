use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use types::ids::UserId;

/// Lifetime of an issued token
pub const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: UserId,
    pub exp: usize,
}

/// Sign an HS256 token for `user_id` with the secret the gateway verifies against
pub fn issue_token(secret: &str, user_id: UserId) -> Result<String, AppError> {
    let exp = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp();
    let claims = Claims {
        user_id,
        exp: usize::try_from(exp).map_err(anyhow::Error::from)?,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(anyhow::Error::from(e)))
}

fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

/// Bearer token from the `Authorization` header, or a `token` query
/// parameter for WebSocket clients that cannot set headers
fn token_from_parts(parts: &Parts) -> Result<Option<&str>, AppError> {
    if let Some(auth_header) = parts.headers.get("Authorization") {
        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid header string".into()))?;
        return auth_str
            .strip_prefix("Bearer ")
            .map(Some)
            .ok_or_else(|| AppError::Unauthorized("Expected a bearer token".into()));
    }

    Ok(parts.uri.query().and_then(|query| {
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix("token="))
    }))
}

/// The caller, identified by a valid token
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

impl AuthenticatedUser {
    /// Fail unless the caller is `user_id`
    pub fn require_self(&self, user_id: UserId, what: &str) -> Result<(), AppError> {
        if self.user_id != user_id {
            return Err(AppError::Forbidden(format!(
                "Cannot {what} for another user"
            )));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts)?.ok_or_else(|| {
            AppError::Unauthorized("Missing authentication credentials".to_string())
        })?;
        let claims = verify_token(&state.jwt_secret, token)?;
        Ok(AuthenticatedUser {
            user_id: claims.user_id,
        })
    }
}
