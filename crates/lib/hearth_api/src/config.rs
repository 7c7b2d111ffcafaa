//! API server configuration.

use chrono::Duration;
use jsonwebtoken::Algorithm;
use thiserror::Error;

use hearth_core::auth::password;
use hearth_core::auth::token::{DEFAULT_TTL_MINUTES, TokenCodec};

/// Configuration errors. All of these abort process start; none are
/// recoverable per-request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set; refusing to start without a signing secret")]
    MissingSecret,

    #[error("unsupported JWT_ALGORITHM: {0}")]
    BadAlgorithm(String),

    #[error("invalid {name}: {value}")]
    BadNumber { name: &'static str, value: String },
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub pg_connection_url: String,
    /// Token signing secret.
    pub jwt_secret: String,
    /// Token signing algorithm.
    pub jwt_algorithm: Algorithm,
    /// Access-token lifetime.
    pub token_ttl: Duration,
    /// bcrypt cost factor for new password digests.
    pub bcrypt_cost: u32,
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable            | Default                                  |
    /// |---------------------|------------------------------------------|
    /// | `BIND_ADDR`         | `127.0.0.1:8000`                         |
    /// | `DATABASE_URL`      | `postgres://localhost:5432/hearth`       |
    /// | `JWT_SECRET`        | required                                 |
    /// | `JWT_ALGORITHM`     | `HS256`                                  |
    /// | `TOKEN_TTL_MINUTES` | `30`                                     |
    /// | `BCRYPT_COST`       | bcrypt default (12)                      |
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let algorithm_name =
            std::env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        let jwt_algorithm = algorithm_name
            .parse()
            .map_err(|_| ConfigError::BadAlgorithm(algorithm_name))?;

        let ttl_minutes = parse_env("TOKEN_TTL_MINUTES", DEFAULT_TTL_MINUTES)?;
        let bcrypt_cost = parse_env("BCRYPT_COST", password::DEFAULT_COST)?;

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".into()),
            pg_connection_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/hearth".into()),
            jwt_secret,
            jwt_algorithm,
            token_ttl: Duration::minutes(ttl_minutes),
            bcrypt_cost,
        })
    }

    /// Build the token codec from this configuration.
    pub fn token_codec(&self) -> TokenCodec {
        TokenCodec::new(
            self.jwt_secret.as_bytes(),
            self.jwt_algorithm,
            self.token_ttl,
        )
    }
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::BadNumber { name, value }),
        Err(_) => Ok(default),
    }
}
