//! Environment configuration for the client and the reference proxy.

use crate::{Error, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8787/api/advisor";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PREFERENCES_PATH: &str = ".roleready/preferences.json";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";
pub const DEFAULT_PROXY_PATH: &str = "/api/advisor";

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub timeout: Duration,
    pub preferences_path: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub bind: SocketAddr,
    pub proxy_path: String,
}

impl Config {
    /// Load `.env` (when present) and read configuration from the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset and blank values
    /// take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let endpoint = get("ROLEREADY_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::Config(format!(
                "ROLEREADY_ENDPOINT must be an http(s) URL, got '{}'",
                endpoint
            )));
        }

        let timeout_secs = match get("ROLEREADY_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                Error::Config(format!(
                    "ROLEREADY_TIMEOUT_SECS must be a positive integer, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let bind_raw = get("ROLEREADY_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.parse::<SocketAddr>().map_err(|_| {
            Error::Config(format!(
                "ROLEREADY_BIND must be a socket address, got '{}'",
                bind_raw
            ))
        })?;

        let proxy_path = get("ROLEREADY_PROXY_PATH").unwrap_or_else(|| DEFAULT_PROXY_PATH.to_string());
        if !proxy_path.starts_with('/') {
            return Err(Error::Config(format!(
                "ROLEREADY_PROXY_PATH must start with '/', got '{}'",
                proxy_path
            )));
        }

        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
            preferences_path: get("ROLEREADY_PREFERENCES")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH)),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: normalize_model(
                &get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            ),
            bind,
            proxy_path,
        })
    }

    /// The model credential. Only the proxy needs it.
    pub fn require_gemini_key(&self) -> Result<&str> {
        self.gemini_api_key
            .as_deref()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))
    }
}

fn normalize_model(model: &str) -> String {
    model.strip_prefix("models/").unwrap_or(model).to_string()
}
