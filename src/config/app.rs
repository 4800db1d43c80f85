// src/config/app.rs
//! Process configuration from environment variables (a `.env` file is
//! loaded by `main` before this runs). Built once at startup and passed down
//! explicitly.

use std::path::PathBuf;
use std::time::Duration;

use crate::export::DEFAULT_DATA_DIR;
use crate::ingest::http::{RetryPolicy, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

pub const ENV_LIQUIPEDIA_API_URL: &str = "LIQUIPEDIA_API_URL";
pub const ENV_EPIC_STORE_API_URL: &str = "EPIC_STORE_API_URL";
pub const ENV_USER_AGENT: &str = "USER_AGENT";
pub const ENV_TWITCH_CLIENT_ID: &str = "TWITCH_CLIENT_ID";
pub const ENV_TWITCH_CLIENT_SECRET: &str = "TWITCH_CLIENT_SECRET";
pub const ENV_DATA_DIR: &str = "DATA_DIR";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_HTTP_MAX_RETRIES: &str = "HTTP_MAX_RETRIES";
pub const ENV_LIMIT_GAMES: &str = "LIMIT_GAMES";
pub const ENV_TOP_N: &str = "TOP_N";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_METRICS_TEXTFILE: &str = "METRICS_TEXTFILE";

pub const DEFAULT_LIMIT_GAMES: usize = 50;
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("env var {0} is required but not set")]
    Missing(&'static str),
    #[error("env var {name} has invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Clone, PartialEq, Eq)]
pub struct TwitchCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for TwitchCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitchCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub liquipedia_url: String,
    pub epic_store_url: String,
    pub user_agent: String,
    /// Twitch is enabled only when both id and secret are set.
    pub twitch: Option<TwitchCredentials>,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
    pub limit_games: usize,
    pub top_n: usize,
    pub log_format: LogFormat,
    pub metrics_textfile: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key → value lookup (env, tests, ...). Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| {
            lookup(k)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |k: &'static str| get(k).ok_or(ConfigError::Missing(k));

        let twitch = match (get(ENV_TWITCH_CLIENT_ID), get(ENV_TWITCH_CLIENT_SECRET)) {
            (Some(client_id), Some(client_secret)) => Some(TwitchCredentials {
                client_id,
                client_secret,
            }),
            _ => None,
        };

        let log_format = match get(ENV_LOG_FORMAT).map(|v| v.to_ascii_lowercase()) {
            None => LogFormat::Compact,
            Some(v) if v == "compact" => LogFormat::Compact,
            Some(v) if v == "json" => LogFormat::Json,
            Some(value) => {
                return Err(ConfigError::Invalid {
                    name: ENV_LOG_FORMAT,
                    value,
                })
            }
        };

        let retry = RetryPolicy {
            max_retries: parse_or(&get, ENV_HTTP_MAX_RETRIES, RetryPolicy::default().max_retries)?,
            ..RetryPolicy::default()
        };

        Ok(Self {
            liquipedia_url: required(ENV_LIQUIPEDIA_API_URL)?,
            epic_store_url: required(ENV_EPIC_STORE_API_URL)?,
            user_agent: get(ENV_USER_AGENT).unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            twitch,
            data_dir: get(ENV_DATA_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            http_timeout: Duration::from_secs(parse_or(
                &get,
                ENV_HTTP_TIMEOUT_SECS,
                DEFAULT_TIMEOUT_SECS,
            )?),
            retry,
            limit_games: parse_or(&get, ENV_LIMIT_GAMES, DEFAULT_LIMIT_GAMES)?,
            top_n: parse_or(&get, ENV_TOP_N, DEFAULT_TOP_N)?,
            log_format,
            metrics_textfile: get(ENV_METRICS_TEXTFILE).map(PathBuf::from),
        })
    }
}

fn parse_or<T, G>(get: &G, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
