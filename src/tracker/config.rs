//! Tracker configuration parsed from environment variables.

use crate::config::{ConfigError, env_parse_u64};

pub const DEFAULT_BUGZILLA_URL: &str = "https://bugzilla.mozilla.org";
pub const DEFAULT_TRACKER_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TRACKER_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for TrackerTimeouts {
    fn default() -> Self {
        Self {
            request_secs: DEFAULT_TRACKER_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_TRACKER_CONNECT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Tracker origin without a trailing slash, e.g. `https://bugzilla.mozilla.org`.
    pub base_url: String,
    pub timeouts: TrackerTimeouts,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BUGZILLA_URL.to_string(), timeouts: TrackerTimeouts::default() }
    }
}

impl TrackerConfig {
    /// Build typed tracker config from environment variables.
    ///
    /// Optional:
    /// - `BUGZILLA_URL`: default `https://bugzilla.mozilla.org`
    /// - `BUGZILLA_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BUGZILLA_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `BUGZILLA_URL` is not an http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("BUGZILLA_URL").unwrap_or_else(|_| DEFAULT_BUGZILLA_URL.to_string());
        let base_url = parse_base_url(&raw)?;
        let timeouts = TrackerTimeouts {
            request_secs: env_parse_u64("BUGZILLA_REQUEST_TIMEOUT_SECS", DEFAULT_TRACKER_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("BUGZILLA_CONNECT_TIMEOUT_SECS", DEFAULT_TRACKER_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { base_url, timeouts })
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl { var: "BUGZILLA_URL".into(), value: raw.to_string() });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
