use anyhow::{Context, Result, anyhow};
use std::{str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub db: u8,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_max_conn: u32,
    pub db_min_conn: u32,
    pub redis: RedisSettings,
    pub otel_endpoint: String,
    pub lock_timeout: Duration,
    pub price_cache_ttl: Duration,
    pub is_dev: bool,
    pub enable_file_log: bool,
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key).with_context(|| format!("Missing environment variable: {key}"))
}

fn parsed_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Unable to parse {key}: '{raw}'")),
        None => Ok(default),
    }
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key).is_some_and(|v| v == "true" || v == "1")
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = required(&lookup, "DATABASE_URL")?;
        let jwt_secret = required(&lookup, "JWT_SECRET")?;
        let run_migrations_str = required(&lookup, "RUN_MIGRATIONS")?;
        let port_str = required(&lookup, "PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_max_conn = parsed_or(&lookup, "DB_MAX_CONNECTION", 5u32)?;
        let db_min_conn = parsed_or(&lookup, "DB_MIN_CONNECTION", 1u32)?;

        let redis = RedisSettings {
            host: lookup("REDIS_HOST").unwrap_or_else(|| "redis".to_string()),
            port: parsed_or(&lookup, "REDIS_PORT", 6379u16)?,
            db: parsed_or(&lookup, "REDIS_DB", 0u8)?,
            password: lookup("REDIS_PASSWORD").filter(|p| !p.is_empty()),
        };

        let otel_endpoint = lookup("OTEL_ENDPOINT")
            .unwrap_or_else(|| "http://otel-collector:4317".to_string());

        let lock_timeout =
            Duration::from_millis(parsed_or(&lookup, "CART_LOCK_TIMEOUT_MS", 5000u64)?);
        let price_cache_ttl =
            Duration::from_secs(parsed_or(&lookup, "PRODUCT_PRICE_CACHE_TTL_SECS", 60u64)?);

        Ok(Self {
            database_url,
            jwt_secret,
            run_migrations,
            port,
            db_max_conn,
            db_min_conn,
            redis,
            otel_endpoint,
            lock_timeout,
            price_cache_ttl,
            is_dev: flag(&lookup, "DEV_MODE"),
            enable_file_log: flag(&lookup, "ENABLE_FILE_LOG"),
        })
    }
}
