use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Nothing is required; every setting has a default or is optional.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// CSV submission log, used unless `log_database_url` is set.
    pub log_file: String,
    pub log_database_url: Option<String>,
    /// Enables the researcher view when set.
    pub admin_password: Option<String>,
    /// Sessions with no transition for this long are evicted.
    pub session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ttl_minutes = get("SESSION_TTL_MINUTES")
            .unwrap_or_else(|| "120".to_string())
            .parse::<u64>()
            .context("SESSION_TTL_MINUTES must be a whole number of minutes")?;
        if ttl_minutes == 0 {
            bail!("SESSION_TTL_MINUTES must be at least 1");
        }

        Ok(Config {
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_file: get("LOG_FILE").unwrap_or_else(|| "interview_logs.csv".to_string()),
            log_database_url: get("LOG_DATABASE_URL"),
            admin_password: get("ADMIN_PASSWORD"),
            session_ttl: Duration::from_secs(ttl_minutes.saturating_mul(60)),
        })
    }
}
