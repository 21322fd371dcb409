//! Client configuration: base URL, timeout and default headers.
//!
//! Read once at startup, usually from the environment, and shared read-only by
//! every call made through the resulting client.

use std::time::Duration;

use crate::http::JSON_CONTENT_TYPE;

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "API_URL";

/// Environment variable overriding the request timeout, in milliseconds.
pub const TIMEOUT_ENV: &str = "API_TIMEOUT_MS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8081";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` disables the timeout entirely.
    pub timeout: Option<Duration>,
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            default_headers: vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())],
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self::default().base_url(base_url)
    }

    /// Build from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            match raw.trim().parse::<u64>() {
                Ok(0) => config.timeout = None,
                Ok(ms) => config.timeout = Some(Duration::from_millis(ms)),
                Err(e) => {
                    tracing::warn!(key = TIMEOUT_ENV, value = %raw, error = %e, "ignoring unparsable timeout");
                }
            }
        }

        config
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Add or replace a default header (names compare case-insensitively).
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        self.default_headers.push((name.to_string(), value.to_string()));
        self
    }
}
