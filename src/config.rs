//! # Configuration Management
//!
//! Configuration comes from the environment (optionally seeded from a `.env`
//! file by `dotenvy` in `main`).
//!
//! ## Environment Variables
//!
//! - `APP_ENV` - "production" selects the real payment processor and JSON logs;
//!   unset or anything else means development
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 8090)
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `JWT_SECRET` - HMAC key for session tokens, at least 32 bytes
//! - `PAYMENT_API_URL` - Required in production for the payment processor
//! - `PAYMENT_API_KEY` - Required in production for the payment processor

use std::env;

use thiserror::Error;

use crate::utils::constant::{DEFAULT_HOST, DEFAULT_PORT, MIN_JWT_SECRET_LEN};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Env variable `{0}` should be set")]
    Missing(&'static str),
    #[error("Env variable `{name}` is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Deployment flavour selected by `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Production,
    Development,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }
}

/// Payment processor credentials, present only in production.
#[derive(Clone)]
pub struct PaymentConfig {
    pub api_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: Vec<u8>,
    pub payment: Option<PaymentConfig>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("payment", &self.payment)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional values fall back to defaults; required values and values that
    /// fail to parse produce a [`ConfigError`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = env::var("APP_ENV")
            .map(|raw| Environment::parse(&raw))
            .unwrap_or(Environment::Development);

        let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = jwt_secret_from_env()?;

        let payment = if environment == Environment::Production {
            Some(PaymentConfig {
                api_url: required("PAYMENT_API_URL")?,
                api_key: required("PAYMENT_API_KEY")?,
            })
        } else {
            None
        };

        Ok(Self {
            environment,
            host,
            port,
            database_url,
            jwt_secret,
            payment,
        })
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reads and checks `JWT_SECRET`.
pub fn jwt_secret_from_env() -> Result<Vec<u8>, ConfigError> {
    let secret = required("JWT_SECRET")?.into_bytes();
    if secret.len() < MIN_JWT_SECRET_LEN {
        return Err(ConfigError::Invalid {
            name: "JWT_SECRET",
            reason: format!("must be at least {MIN_JWT_SECRET_LEN} bytes"),
        });
    }
    Ok(secret)
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}
