use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use jobboard_core::breaker::BreakerConfig;
use jobboard_core::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    pub vacancy_service_url: String,
    pub remote_timeout: Duration,
    pub breaker: BreakerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            jwt_secret: get_env("JWT_SECRET")?,
            vacancy_service_url: get_env("VACANCY_SERVICE_URL")?,
            remote_timeout: Duration::from_millis(env_or("REMOTE_TIMEOUT_MS", 5_000)?),
            breaker: BreakerConfig::from_env()?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}
