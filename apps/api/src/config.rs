use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::auth::provider::DEFAULT_IDENTITY_BASE_URL;
use crate::careernet::retry::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};

pub const DEFAULT_CAREERNET_BASE_URL: &str = "https://www.career.go.kr/inspct/openapi";
pub const DEFAULT_CAREERNET_BASE_URL_V2: &str = "https://www.career.go.kr/inspct/openapi/v2";
/// Placeholder key for local development; upstream calls made with it are
/// expected to fail and fall back to sample data.
pub const DEV_CAREERNET_API_KEY: &str = "development-key";

const DEFAULT_CAREERNET_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
/// Only `IDENTITY_API_KEY` is required; missing storage or upstream
/// credentials fall back to development defaults (see [`Config::warnings`]).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub careernet_api_key: Option<String>,
    pub careernet_base_url: String,
    pub careernet_base_url_v2: String,
    pub careernet_endpoints_file: Option<PathBuf>,
    pub careernet_timeout: Duration,
    pub careernet_max_attempts: u32,
    pub careernet_retry_delay: Duration,
    pub identity_api_key: String,
    pub identity_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            careernet_api_key: optional_env("CAREERNET_API_KEY"),
            careernet_base_url: optional_env("CAREERNET_BASE_URL")
                .unwrap_or_else(|| DEFAULT_CAREERNET_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            careernet_base_url_v2: optional_env("CAREERNET_BASE_URL_V2")
                .unwrap_or_else(|| DEFAULT_CAREERNET_BASE_URL_V2.to_string())
                .trim_end_matches('/')
                .to_string(),
            careernet_endpoints_file: optional_env("CAREERNET_ENDPOINTS_FILE").map(PathBuf::from),
            careernet_timeout: Duration::from_secs(parse_env(
                "CAREERNET_TIMEOUT_SECS",
                DEFAULT_CAREERNET_TIMEOUT_SECS,
            )?),
            careernet_max_attempts: parse_env("CAREERNET_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS)?,
            careernet_retry_delay: Duration::from_millis(parse_env(
                "CAREERNET_RETRY_DELAY_MS",
                DEFAULT_RETRY_DELAY.as_millis() as u64,
            )?),
            identity_api_key: require_env("IDENTITY_API_KEY")?,
            identity_base_url: optional_env("IDENTITY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IDENTITY_BASE_URL.to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn careernet_api_key(&self) -> &str {
        self.careernet_api_key
            .as_deref()
            .unwrap_or(DEV_CAREERNET_API_KEY)
    }

    /// Development fallbacks in effect, to be logged once tracing is up.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.database_url.is_none() {
            warnings.push(
                "DATABASE_URL is not set; profiles are kept in memory and lost on restart",
            );
        }
        if self.careernet_api_key.is_none() {
            warnings.push(
                "CAREERNET_API_KEY is not set; using a development key, expect sample data",
            );
        }
        warnings
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        None => Ok(default),
    }
}
