//! Tunables and environment-driven settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;
use crate::fetch::DEFAULT_BASE_URL;

pub const DEFAULT_AVATAR_BASE_URL: &str = "https://avatars.githubusercontent.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Ambient color scheme of the page the chart is mounted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

/// Playback options of the race.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RaceOptions {
    /// Playback multiplier; 2.0 plays twice as fast.
    pub speed: f64,
    /// Number of visible rank slots.
    pub max_bars: usize,
    pub enable_animation: bool,
}

impl Default for RaceOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            max_bars: 10,
            enable_animation: true,
        }
    }
}

impl RaceOptions {
    pub fn new(speed: f64, max_bars: usize, enable_animation: bool) -> Result<Self, ConfigError> {
        let options = Self {
            speed,
            max_bars,
            enable_animation,
        };
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_speed(self.speed)?;
        if self.max_bars == 0 {
            return Err(ConfigError::InvalidMaxBars(self.max_bars));
        }
        Ok(())
    }
}

pub(crate) fn validate_speed(speed: f64) -> Result<(), ConfigError> {
    if !speed.is_finite() || speed <= 0.0 {
        return Err(ConfigError::InvalidSpeed(speed));
    }
    Ok(())
}

/// Endpoint settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub openrank_base_url: String,
    pub avatar_base_url: String,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openrank_base_url: DEFAULT_BASE_URL.to_string(),
            avatar_base_url: DEFAULT_AVATAR_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// Reads `OPENRANK_BASE_URL`, `AVATAR_BASE_URL` and
    /// `OPENRANK_TIMEOUT_SECS`, falling back to the defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let request_timeout = match std::env::var("OPENRANK_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse::<u64>()
                    .with_context(|| format!("OPENRANK_TIMEOUT_SECS is not a number: '{raw}'"))?,
            ),
            Err(_) => defaults.request_timeout,
        };

        Ok(Self {
            openrank_base_url: non_empty_var("OPENRANK_BASE_URL")
                .unwrap_or(defaults.openrank_base_url),
            avatar_base_url: non_empty_var("AVATAR_BASE_URL").unwrap_or(defaults.avatar_base_url),
            request_timeout,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.trim().is_empty())
}
