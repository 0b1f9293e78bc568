use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Context};

pub static DATABASE_URL: &str = "DATABASE_URL";
pub static BIND_ADDRESS: &str = "BIND_ADDRESS";
pub static UPLOAD_PATH: &str = "UPLOAD_PATH";
pub static DB_MAX_CONNECTIONS: &str = "DB_MAX_CONNECTIONS";
pub static DB_CONNECT_RETRIES: &str = "DB_CONNECT_RETRIES";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub upload_path: String,
    pub jwt_secret: String,
    pub max_connections: u32,
    pub connect_retries: u32,
}

impl Config {
    /// Reads the process environment, after `.env` has been loaded by the caller.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| anyhow!("environment variable {} not been set", key));
        Ok(Self {
            database_url: required(DATABASE_URL)?,
            bind_address: lookup(BIND_ADDRESS).unwrap_or_else(|| "0.0.0.0:8000".into()),
            upload_path: lookup(UPLOAD_PATH).unwrap_or_else(|| "uploads".into()),
            jwt_secret: required(crate::middlewares::jwt::JWT_SECRET)?,
            max_connections: parse_or(lookup(DB_MAX_CONNECTIONS), DB_MAX_CONNECTIONS, 5)?,
            connect_retries: parse_or(lookup(DB_CONNECT_RETRIES), DB_CONNECT_RETRIES, 3)?,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        None => {
            log::info!("{} not set, using default", key);
            Ok(default)
        }
        Some(v) => v.trim().parse::<T>().map_err(|e| anyhow!("{}", e)).with_context(|| format!("invalid value for {}", key)),
    }
}
