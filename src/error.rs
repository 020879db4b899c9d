//! Error types for the fetch, configuration and color-resolution stages.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure to obtain one month's snapshot.
///
/// A sweep treats every variant the same way: the month is logged and skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success status.
    #[error("http error: status {status}")]
    Http { status: StatusCode },

    /// The body was not a `{ "nodes": [...] }` document.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request never produced a response (DNS, connect, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid endpoint url '{url}'")]
    InvalidUrl { url: String },
}

impl FetchError {
    /// Short machine-friendly label, used as a structured log field.
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Http { .. } => "http",
            FetchError::Parse(_) => "parse",
            FetchError::Transport(_) => "transport",
            FetchError::InvalidUrl { .. } => "invalid_url",
        }
    }
}

/// Rejected tunables. Always fatal to the call that received them.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid speed {0}: must be a finite number greater than zero")]
    InvalidSpeed(f64),

    #[error("invalid max_bars {0}: must be greater than zero")]
    InvalidMaxBars(usize),

    #[error("invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("invalid month range: {from} is after {to}")]
    InvalidRange { from: String, to: String },
}

/// A color lookup that could not be served. Never blocks a frame.
#[derive(Debug, Error)]
#[error("color lookup failed for '{entity_id}': {message}")]
pub struct ResolverError {
    pub entity_id: String,
    pub message: String,
}

impl ResolverError {
    pub fn new(entity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}
