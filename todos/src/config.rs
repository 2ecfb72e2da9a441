//! Configuration management for the todos client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! The binary reads a `.env` file first (through `dotenvy`), so the same
//! variables can live there.

use crate::error::ConfigError;
use crate::types::UserId;
use std::env;
use std::time::Duration;

/// Base URL of the public todo resource
pub const DEFAULT_API_URL: &str = "https://mate.academy/students-api";
/// User the list belongs to when `TODOS_USER_ID` is unset
pub const DEFAULT_USER_ID: u64 = 2351;
/// HTTP timeout in seconds when `TODOS_REQUEST_TIMEOUT_SECS` is unset
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the remote resource (`TODOS_API_URL`)
    pub api_url: String,
    /// Owner of the list (`TODOS_USER_ID`)
    pub user_id: UserId,
    /// HTTP client timeout (`TODOS_REQUEST_TIMEOUT_SECS`)
    pub request_timeout: Duration,
    /// Keep everything in memory instead of calling the API (`TODOS_OFFLINE`)
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: UserId::new(DEFAULT_USER_ID),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            offline: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to a value that
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Unset and blank variables take their default.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to a value that
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let api_url = var("TODOS_API_URL").unwrap_or(defaults.api_url);

        let user_id = match var("TODOS_USER_ID") {
            Some(raw) => UserId::new(parse_u64("TODOS_USER_ID", &raw)?),
            None => defaults.user_id,
        };

        let request_timeout = match var("TODOS_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = parse_u64("TODOS_REQUEST_TIMEOUT_SECS", &raw)?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        var: "TODOS_REQUEST_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Duration::from_secs(secs)
            },
            None => defaults.request_timeout,
        };

        let offline = match var("TODOS_OFFLINE") {
            Some(raw) => parse_flag("TODOS_OFFLINE", &raw)?,
            None => defaults.offline,
        };

        Ok(Self {
            api_url,
            user_id,
            request_timeout,
            offline,
        })
    }

    /// How long to wait for the calls started by one command to settle
    ///
    /// One second past the client timeout, so a call that times out is
    /// still reduced before the wait gives up.
    #[must_use]
    pub fn settle_wait(&self) -> Duration {
        self.request_timeout.saturating_add(Duration::from_secs(1))
    }
}

fn parse_u64(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected a boolean (1/0, true/false)".to_string(),
        }),
    }
}
