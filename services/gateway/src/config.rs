//! Runtime configuration from environment variables

use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_DATABASE_PATH: &str = "loveconnect.db";

/// Only suitable for local development
pub const DEV_JWT_SECRET: &str = "loveconnect-dev-secret-change-me";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
    pub jwt_secret: String,
    pub seed_sample_data: bool,
}

impl Config {
    /// Read the process environment, after loading `.env` if one exists
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let database_path = lookup("DATABASE_PATH")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if secret.is_empty() => {
                return Err(ConfigError::Invalid {
                    key: "JWT_SECRET",
                    value: secret,
                    reason: "must not be empty",
                });
            }
            Some(secret) => secret,
            None => DEV_JWT_SECRET.to_string(),
        };

        let seed_sample_data = match lookup("SEED_SAMPLE_DATA") {
            Some(raw) => parse_flag(&raw).ok_or(ConfigError::Invalid {
                key: "SEED_SAMPLE_DATA",
                value: raw,
                reason: "expected true or false",
            })?,
            None => false,
        };

        Ok(Self {
            port,
            database_path,
            jwt_secret,
            seed_sample_data,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
