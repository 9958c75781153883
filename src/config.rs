//! Startup configuration sourced from the environment
//!
//! Values come from process environment variables, typically populated from a
//! `.env` file by `dotenvy` before [`Config::from_env`] runs. Missing required
//! values are fatal: every missing variable is reported at once so a fresh
//! checkout can be fixed in one pass.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::data::PageRequest;
use crate::stats::TieBreak;

/// Records requested per page unless `DEFAULT_LIMIT` says otherwise
pub const DEFAULT_PAGE_SIZE: usize = 20_000;

/// Cache freshness window in seconds unless `CACHE_TIMEOUT` says otherwise
pub const DEFAULT_CACHE_TIMEOUT_SECS: u64 = 300;

/// Per-request HTTP timeout in seconds unless `REQUEST_TIMEOUT` says otherwise
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

const REQUIRED_VARS: [&str; 3] = ["ORDS_BASE_URL", "ORDS_USERNAME", "ORDS_PASSWORD"];

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required variables are unset or empty
    #[error(
        "missing required environment variables: {}. Copy .env.example to .env and fill them in",
        .0.join(", ")
    )]
    Missing(Vec<&'static str>),

    /// A variable is set but its value cannot be used
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Colour scheme for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err("expected 'dark' or 'light'".to_string()),
        }
    }
}

/// Connection settings for the REST data API
#[derive(Debug)]
pub struct ApiConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    pub username: String,
    pub password: SecretString,
    /// Records requested per page
    pub page_size: usize,
    /// Upper bound on records fetched per endpoint
    pub max_records: Option<usize>,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            limit: self.page_size,
            max_records: self.max_records,
        }
    }
}

/// Complete application configuration
#[derive(Debug)]
pub struct Config {
    pub api: ApiConfig,
    pub cache_timeout: Duration,
    pub theme: Theme,
    pub tie_break: TieBreak,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Config {
    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|name| get(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        let base_url = parse_base_url(get("ORDS_BASE_URL").unwrap_or_default())?;
        let username = get("ORDS_USERNAME").unwrap_or_default();
        let password = SecretString::new(get("ORDS_PASSWORD").unwrap_or_default());

        let page_size = parse_var(&get, "DEFAULT_LIMIT")?.unwrap_or(DEFAULT_PAGE_SIZE);
        if page_size == 0 {
            return Err(invalid("DEFAULT_LIMIT", "0", "page size must be positive"));
        }

        let max_records: Option<usize> = parse_var(&get, "MAX_RECORDS")?;
        if max_records == Some(0) {
            return Err(invalid("MAX_RECORDS", "0", "record cap must be positive"));
        }

        let request_timeout_secs =
            parse_var(&get, "REQUEST_TIMEOUT")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_secs == 0 {
            return Err(invalid("REQUEST_TIMEOUT", "0", "timeout must be positive"));
        }

        let cache_timeout_secs =
            parse_var(&get, "CACHE_TIMEOUT")?.unwrap_or(DEFAULT_CACHE_TIMEOUT_SECS);

        let theme = parse_var(&get, "DEFAULT_THEME")?.unwrap_or_default();
        let tie_break = parse_var(&get, "MODE_TIE_BREAK")?.unwrap_or_default();

        let log_level = get("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_dir = get("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));

        Ok(Self {
            api: ApiConfig {
                base_url,
                username,
                password,
                page_size,
                max_records,
                request_timeout: Duration::from_secs(request_timeout_secs),
            },
            cache_timeout: Duration::from_secs(cache_timeout_secs),
            theme,
            tie_break,
            log_level,
            log_dir,
        })
    }
}

fn parse_base_url(raw: String) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    reqwest::Url::parse(&trimmed)
        .map_err(|e| invalid("ORDS_BASE_URL", &raw, &e.to_string()))?;
    Ok(trimmed)
}

fn parse_var<T, G>(get: &G, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| invalid(var, &raw, &e.to_string())),
        None => Ok(None),
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
