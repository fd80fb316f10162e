//! Process configuration, read once from the environment at startup.

use std::env;
use std::time::Duration;

use super::db::{db_url, max_connections, must_var};
use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TOKEN_MINUTES: u64 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_lifetime: Duration,
    pub database_url: String,
    pub max_connections: u32,
    /// Raw entries from `CORS_ALLOWED_ORIGINS`; filtered by the CORS middleware.
    pub cors_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var("BACKEND_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a port number, got '{raw}'"))
            })?,
            Err(_) => DEFAULT_PORT,
        };

        let jwt_secret = must_var("BACKEND_JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(AppError::config("BACKEND_JWT_SECRET must not be empty"));
        }

        let minutes = match env::var("TOKEN_LIFETIME") {
            Ok(raw) => raw.parse::<u64>().ok().filter(|m| *m > 0).ok_or_else(|| {
                AppError::config(format!(
                    "TOKEN_LIFETIME must be a positive number of minutes, got '{raw}'"
                ))
            })?,
            Err(_) => DEFAULT_TOKEN_MINUTES,
        };

        let lifetime_secs = minutes
            .checked_mul(60)
            .filter(|secs| i64::try_from(*secs).is_ok())
            .ok_or_else(|| {
                AppError::config(format!("TOKEN_LIFETIME of {minutes} minutes is too large"))
            })?;

        let cors_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_lifetime: Duration::from_secs(lifetime_secs),
            database_url: db_url()?,
            max_connections: max_connections()?,
            cors_origins,
        })
    }
}
