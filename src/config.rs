//! Client configuration: base URL, default token, retry defaults, timeouts.
//!
//! Loaded from a JSON file or from `FETCH_*` environment variables.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::fetch::BasicClient;
use crate::request::RequestConfig;
use crate::request::config::{DEFAULT_MAX_RETRIES, DEFAULT_TOKEN_ERROR_CODE};

/// Settings shared by every request a client makes.
///
/// Stored as a camelCase JSON object on disk:
/// ```json
/// {
///   "baseUrl": "https://api.example.com",
///   "token": "abc123",
///   "retryOnError": true,
///   "maxRetries": 5,
///   "timeoutSecs": 30
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub retry_on_error: bool,
    pub max_retries: u32,
    pub token_error_code: u16,
    pub timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            token: None,
            retry_on_error: false,
            max_retries: DEFAULT_MAX_RETRIES,
            token_error_code: DEFAULT_TOKEN_ERROR_CODE.as_u16(),
            timeout_secs: None,
            connect_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        let config: ClientConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file '{path}'"))?;
        Ok(config)
    }

    /// Builds the config from `FETCH_*` environment variables. Unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("FETCH_BASE_URL") {
            config.base_url = base_url;
        }
        config.token = lookup("FETCH_TOKEN").filter(|t| !t.is_empty());
        if let Some(v) = lookup("FETCH_RETRY_ON_ERROR") {
            config.retry_on_error = parse_var("FETCH_RETRY_ON_ERROR", &v)?;
        }
        if let Some(v) = lookup("FETCH_MAX_RETRIES") {
            config.max_retries = parse_var("FETCH_MAX_RETRIES", &v)?;
        }
        if let Some(v) = lookup("FETCH_TOKEN_ERROR_CODE") {
            config.token_error_code = parse_var("FETCH_TOKEN_ERROR_CODE", &v)?;
        }
        if let Some(v) = lookup("FETCH_TIMEOUT_SECS") {
            config.timeout_secs = Some(parse_var("FETCH_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("FETCH_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout_secs = Some(parse_var("FETCH_CONNECT_TIMEOUT_SECS", &v)?);
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base URL must not be empty");
        }
        self.token_error_status()?;
        Ok(())
    }

    pub fn token_error_status(&self) -> Result<StatusCode> {
        StatusCode::from_u16(self.token_error_code)
            .with_context(|| format!("invalid token error code {}", self.token_error_code))
    }

    /// Builds the reqwest-backed transport with the configured timeouts.
    pub fn build_client(&self) -> Result<BasicClient> {
        let client = BasicClient::with_timeouts(
            self.timeout_secs.map(Duration::from_secs),
            self.connect_timeout_secs.map(Duration::from_secs),
        )?;
        Ok(client)
    }

    /// A per-call config seeded with this client's retry and token-error
    /// settings.
    pub fn request_defaults(&self) -> Result<RequestConfig> {
        let mut config = RequestConfig::new().token_error_code(self.token_error_status()?);
        config.retry_on_error = self.retry_on_error;
        config.max_retries = self.max_retries;
        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value '{value}' for {key}"))
}
