// src/config.rs
use log::warn;
use serde::Serialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Open-data aggregator exports.
    Aggregator,
    /// Commercial terminal exports.
    Terminal,
}

impl FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aggregator" | "akshare" => Ok(ProviderKind::Aggregator),
            "terminal" | "wind" => Ok(ProviderKind::Terminal),
            other => Err(AppError::Config(format!("unknown DATA_PROVIDER '{}'", other))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProviderKind::Aggregator => write!(f, "aggregator"),
            ProviderKind::Terminal => write!(f, "terminal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub retries: u32,
    pub retry_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            timeout: Duration::from_secs(120),
            retries: 2,
            retry_delay: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub provider: ProviderKind,
    /// Directory or base URL the provider tables are read from.
    pub data_dir: String,
    pub cache_ttl: Duration,
    pub fetch: FetchSettings,
}

fn parse_var<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| AppError::Config(format!("{} must be a number, got '{}'", name, value))),
        None => Ok(default),
    }
}

impl Settings {
    /// Reads the process environment (after `.env`, when present).
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(port) => parse_var("PORT", Some(port), 3002u16)?,
            None => {
                warn!("$PORT not set, defaulting to 3002");
                3002
            }
        };

        let provider = match lookup("DATA_PROVIDER") {
            Some(kind) => kind.parse()?,
            None => ProviderKind::Aggregator,
        };

        let data_dir = lookup("DATA_DIR")
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "data".to_string());

        let defaults = FetchSettings::default();
        let fetch = FetchSettings {
            timeout: Duration::from_secs(parse_var(
                "FETCH_TIMEOUT_SECS",
                lookup("FETCH_TIMEOUT_SECS"),
                defaults.timeout.as_secs(),
            )?),
            retries: parse_var("FETCH_RETRIES", lookup("FETCH_RETRIES"), defaults.retries)?.max(1),
            retry_delay: Duration::from_millis(parse_var(
                "FETCH_RETRY_DELAY_MS",
                lookup("FETCH_RETRY_DELAY_MS"),
                defaults.retry_delay.as_millis() as u64,
            )?),
        };

        Ok(Settings {
            port,
            provider,
            data_dir,
            cache_ttl: Duration::from_secs(parse_var(
                "CACHE_TTL_SECS",
                lookup("CACHE_TTL_SECS"),
                300u64,
            )?),
            fetch,
        })
    }
}
