use std::fmt::Display;
use std::str::FromStr;

use crate::error::Error;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const JWT_SECRET: &str = "JWT_SECRET";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub port: u16,
    pub max_connections: u32,
    pub session_ttl: chrono::Duration,
}

impl Config {
    /// Reads the process environment, after `.env` has been loaded.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| Error::ServerError(format!("environment variable {} not been set", key)));
        let hours: i64 = try_load(&lookup, "SESSION_TTL_HOURS", "24")?;
        if hours <= 0 {
            return Err(Error::ServerError(format!("invalid SESSION_TTL_HOURS value: {}", hours)));
        }
        Ok(Self {
            database_url: required(DATABASE_URL)?,
            jwt_secret: required(JWT_SECRET)?,
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".into()),
            port: try_load(&lookup, "PORT", "8000")?,
            max_connections: try_load(&lookup, "MAX_CONNECTIONS", "5")?,
            session_ttl: chrono::Duration::hours(hours),
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &str, default: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| {
        log::info!("{} not set, using default: {}", key, default);
        default.to_owned()
    });
    raw.parse().map_err(|e| Error::ServerError(format!("invalid {} value: {}", key, e)))
}
