// src/config.rs
use std::{env, fmt::Display, net::IpAddr, str::FromStr};

use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub db_max_connections: u32,
    pub cors_origin: Option<String>,
    pub cookie_secure: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Admin account created at startup when none exists with that email.
#[derive(Clone, Debug)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;
        let session_secret = required("SESSION_SECRET").or_else(|_| required("JWT_SECRET"))?;
        if session_secret.len() < 16 {
            return Err(ConfigError::Invalid {
                key: "SESSION_SECRET",
                reason: "must be at least 16 characters".to_string(),
            });
        }

        let bootstrap_admin = match (optional("ADMIN_EMAIL"), optional("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            _ => None,
        };

        Ok(Self {
            database_url,
            host: parse_or("HOST", "127.0.0.1")?,
            port: parse_or("PORT", "3000")?,
            session_secret,
            session_ttl_hours: parse_or("SESSION_TTL_HOURS", "8")?,
            bcrypt_cost: parse_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())?,
            db_max_connections: parse_or("DB_MAX_CONNECTIONS", "10")?,
            cors_origin: optional("CORS_ORIGIN"),
            cookie_secure: parse_or("COOKIE_SECURE", "false")?,
            bootstrap_admin,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    optional(key).ok_or(ConfigError::Missing(key))
}

fn parse_or<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = optional(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}
