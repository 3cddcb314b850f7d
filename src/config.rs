//! Client configuration parsed from environment variables.
//!
//! Every knob has a default that matches a local development backend, so an
//! empty environment yields a usable config. Values that are present but
//! unparsable are reported instead of silently falling back.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use crate::query::retry::RetryPolicy;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STARTUP_GRACE_MS: u64 = 100;
pub const DEFAULT_LOGIN_SETTLE_MS: u64 = 200;
pub const DEFAULT_QUERY_STALE_SECS: u64 = 30;
pub const DEFAULT_QUERY_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_BASE_MS: u64 = 1_000;
pub const DEFAULT_RETRY_MAX_MS: u64 = 30_000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("invalid base URL {0:?}: expected http:// or https://")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request: Duration,
    pub connect: Duration,
}

/// Fixed waits that absorb cookie propagation and backend cold starts.
///
/// Neither is needed for correctness; tests run with [`SessionTimings::zero`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimings {
    /// Pause between the startup probe settling and `loading` turning false.
    pub startup_grace: Duration,
    /// Pause after a successful login response before the call returns.
    pub login_settle: Duration,
}

impl SessionTimings {
    #[must_use]
    pub const fn zero() -> Self {
        Self { startup_grace: Duration::ZERO, login_settle: Duration::ZERO }
    }
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            startup_grace: Duration::from_millis(DEFAULT_STARTUP_GRACE_MS),
            login_settle: Duration::from_millis(DEFAULT_LOGIN_SETTLE_MS),
        }
    }
}

/// Defaults applied to every query the cache builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDefaults {
    pub stale_time: Duration,
    pub retry: RetryPolicy,
}

impl Default for QueryDefaults {
    fn default() -> Self {
        Self { stale_time: Duration::from_secs(DEFAULT_QUERY_STALE_SECS), retry: RetryPolicy::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeouts: HttpTimeouts,
    pub session: SessionTimings,
    pub queries: QueryDefaults,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            timeouts: HttpTimeouts {
                request: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
                connect: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            },
            session: SessionTimings::default(),
            queries: QueryDefaults::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `ONLEARN_API_URL`: backend base URL (default `http://localhost:8000`)
    /// - `ONLEARN_REQUEST_TIMEOUT_SECS` / `ONLEARN_CONNECT_TIMEOUT_SECS`
    /// - `ONLEARN_STARTUP_GRACE_MS` / `ONLEARN_LOGIN_SETTLE_MS`
    /// - `ONLEARN_QUERY_STALE_SECS`: staleness window for cached reads
    /// - `ONLEARN_QUERY_MAX_RETRIES`, `ONLEARN_RETRY_BASE_MS`, `ONLEARN_RETRY_MAX_MS`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).map_err(|_| ()))
    }

    /// Same as [`ClientConfig::from_env`] but reads through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a value is present but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, ()>,
    {
        let base_url = match lookup("ONLEARN_API_URL") {
            Ok(raw) => normalize_base_url(&raw)?,
            Err(()) => DEFAULT_API_URL.to_owned(),
        };

        let timeouts = HttpTimeouts {
            request: Duration::from_secs(parse_var(&lookup, "ONLEARN_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?),
            connect: Duration::from_secs(parse_var(&lookup, "ONLEARN_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?),
        };
        let session = SessionTimings {
            startup_grace: Duration::from_millis(parse_var(&lookup, "ONLEARN_STARTUP_GRACE_MS", DEFAULT_STARTUP_GRACE_MS)?),
            login_settle: Duration::from_millis(parse_var(&lookup, "ONLEARN_LOGIN_SETTLE_MS", DEFAULT_LOGIN_SETTLE_MS)?),
        };
        let retry = RetryPolicy {
            max_retries: parse_var(&lookup, "ONLEARN_QUERY_MAX_RETRIES", DEFAULT_QUERY_MAX_RETRIES)?,
            base_delay: Duration::from_millis(parse_var(&lookup, "ONLEARN_RETRY_BASE_MS", DEFAULT_RETRY_BASE_MS)?),
            max_delay: Duration::from_millis(parse_var(&lookup, "ONLEARN_RETRY_MAX_MS", DEFAULT_RETRY_MAX_MS)?),
        };
        let queries = QueryDefaults {
            stale_time: Duration::from_secs(parse_var(&lookup, "ONLEARN_QUERY_STALE_SECS", DEFAULT_QUERY_STALE_SECS)?),
            retry,
        };

        Ok(Self { base_url, timeouts, session, queries })
    }

    /// Replace the base URL, applying the same validation as the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a non-http(s) URL.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(self)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidBaseUrl(raw.to_owned()))
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, ()>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { var, value: raw }),
        Err(()) => Ok(default),
    }
}
