//! Client configuration
//!
//! Settings come from the environment (optionally seeded from a `.env` file):
//! - `HEALTH_TRACKER_API_URL`: backend base URL (default `http://localhost:8080/`)
//! - `HEALTH_TRACKER_API_TOKEN`: bearer token sent with every request (optional)
//! - `HEALTH_TRACKER_TIMEOUT_SECS`: request timeout in seconds (default 30)

use std::env;
use std::time::Duration;

use tracing::{debug, info};
use url::Url;

use crate::errors::{ClientError, ClientResult};

/// Backend used when no URL is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";

/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the REST client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend; resource paths are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub auth_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for the backend at `base_url`
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            auth_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Override the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load the configuration from the environment, reading `.env` first if present
    pub fn from_env() -> ClientResult<Self> {
        if dotenv::dotenv().is_err() {
            debug!(".env file not found, using process environment only");
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("HEALTH_TRACKER_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match lookup("HEALTH_TRACKER_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("HEALTH_TRACKER_TIMEOUT_SECS must be a number of seconds, got '{}'", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let mut config = Self::new(&base_url)?.with_timeout(Duration::from_secs(timeout_secs));

        if let Some(token) = lookup("HEALTH_TRACKER_API_TOKEN").filter(|t| !t.trim().is_empty()) {
            config = config.with_token(token);
        }

        info!(
            "Client configuration: base_url={}, timeout={}s, authenticated={}",
            config.base_url,
            timeout_secs,
            config.auth_token.is_some()
        );

        Ok(config)
    }
}

/// Parse the base URL and make sure it ends with `/` so that relative
/// resource paths are appended rather than replacing the last segment.
fn normalize_base_url(raw: &str) -> ClientResult<Url> {
    let mut url = Url::parse(raw.trim())?;

    if url.cannot_be_a_base() {
        return Err(ClientError::Config(format!("'{}' cannot be used as a base URL", raw)));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
