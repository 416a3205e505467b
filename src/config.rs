//! Client configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

pub const API_BASE_URL_VAR: &str = "DIARY_API_BASE_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "DIARY_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from process environment variables.
    ///
    /// Optional:
    /// - `DIARY_API_BASE_URL`: backend base URL, default `http://127.0.0.1:8000`
    /// - `DIARY_REQUEST_TIMEOUT_SECS`: default 15
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from values baked in at compile time.
    ///
    /// Browser builds have no process environment, so deployments set the
    /// same variables when building the WASM bundle.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_lookup(|key| match key {
            API_BASE_URL_VAR => option_env!("DIARY_API_BASE_URL").map(str::to_owned),
            REQUEST_TIMEOUT_VAR => option_env!("DIARY_REQUEST_TIMEOUT_SECS").map(str::to_owned),
            _ => None,
        })
    }

    /// Build config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = normalize_base_url(lookup(API_BASE_URL_VAR).as_deref());
        let timeout_secs = parse_u64(lookup(REQUEST_TIMEOUT_VAR).as_deref(), DEFAULT_REQUEST_TIMEOUT_SECS);
        Self { base_url, request_timeout: Duration::from_secs(timeout_secs) }
    }

    /// Join an API path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn normalize_base_url(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => value.trim_end_matches('/').to_owned(),
        _ => DEFAULT_API_BASE_URL.to_owned(),
    }
}

fn parse_u64(raw: Option<&str>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
