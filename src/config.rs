// config.rs
use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub port: u16,
    pub redis_url: Option<String>,
    // Cache lifetimes (seconds) for the two parameterless listing queries
    pub popular_cache_ttl: u64,
    pub map_cache_ttl: u64,
    pub query_timeout_secs: u64,
    pub db_max_connections: u32,
    pub allowed_origins: Vec<String>,
    pub run_migrations: bool,
}

impl Config {
    pub fn init() -> anyhow::Result<Config> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = env::var("JWT_SECRET_KEY").context("JWT_SECRET_KEY must be set")?;

        let redis_url = env::var("REDIS_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173,http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Config {
            database_url,
            jwt_secret,
            port: parse_var("PORT", 8000)?,
            redis_url,
            popular_cache_ttl: parse_var("POPULAR_CACHE_TTL", 60)?,
            map_cache_ttl: parse_var("MAP_CACHE_TTL", 300)?,
            query_timeout_secs: parse_var("QUERY_TIMEOUT_SECS", 5)?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 10)?,
            allowed_origins,
            run_migrations: parse_var("RUN_MIGRATIONS", false)?,
        })
    }
}

/// Reads an optional variable, falling back to `default` when it is unset.
/// A value that is set but does not parse is an error rather than a silent default.
fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}
