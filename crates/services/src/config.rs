use std::env;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid backend URL: {0}")]
    InvalidBaseUrl(String),
}

/// Where the quiz backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackendConfig {
    base_url: Url,
}

impl BackendConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` unless `raw` is an absolute http(s) URL.
    pub fn new(raw: &str) -> Result<Self, ConfigError> {
        let base_url =
            Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
        }
        Ok(Self { base_url })
    }

    /// Reads `QUIZ_API_BASE_URL`, falling back to the local development backend.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the variable holds an invalid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var("QUIZ_API_BASE_URL") {
            Ok(value) if !value.trim().is_empty() => Self::new(&value),
            _ => Self::new(DEFAULT_API_BASE_URL),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends percent-encoded path segments to the base URL.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
