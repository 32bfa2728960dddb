//! Service configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Everything is optional with a sensible default so `cargo run` serves a
//! board against bugzilla.mozilla.org out of the box. Bad values that can be
//! defaulted silently (numbers) are; values that would produce broken board
//! links (URLs, render mode) fail startup instead.

use reqwest::Url;

use crate::board::render::RenderMode;
use crate::tracker::TrackerConfig;

pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL in {var}: {value}")]
    InvalidUrl { var: String, value: String },

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

// =============================================================================
// APP CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Base URL board links are encoded against (the page the board lives on).
    pub public_url: Url,
    pub render_mode: RenderMode,
    pub tracker: TrackerConfig,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `BUGBOARD_PUBLIC_URL`: default `http://localhost:<PORT>/`
    /// - `BUGBOARD_RENDER_MODE`: `flat` (default) or `classified`
    /// - tracker settings, see [`TrackerConfig::from_env`]
    ///
    /// # Errors
    ///
    /// Returns an error if a URL or the render mode cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = env_parse("PORT", DEFAULT_PORT);
        let public_url = match std::env::var("BUGBOARD_PUBLIC_URL") {
            Ok(raw) => parse_public_url(&raw)?,
            Err(_) => parse_public_url(&format!("http://localhost:{port}/"))?,
        };
        let render_mode = parse_render_mode(std::env::var("BUGBOARD_RENDER_MODE").ok().as_deref())?;
        let tracker = TrackerConfig::from_env()?;

        Ok(Self { port, public_url, render_mode, tracker })
    }
}

fn parse_public_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl { var: "BUGBOARD_PUBLIC_URL".into(), value: raw.to_string() };
    let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
    if url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

fn parse_render_mode(raw: Option<&str>) -> Result<RenderMode, ConfigError> {
    match raw.unwrap_or("flat") {
        "flat" => Ok(RenderMode::Flat),
        "classified" => Ok(RenderMode::Classified),
        other => Err(ConfigError::InvalidValue { var: "BUGBOARD_RENDER_MODE".into(), value: other.to_string() }),
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_parse_u64(key: &str, default: u64) -> u64 {
    env_parse(key, default)
}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
