//! Client configuration.
//!
//! The backend base URL comes from `NOTESNAP_API_BASE_URL`; everything
//! else is a fixed timeout.  The backend is expected on the same LAN,
//! so the connect timeout is short: either the host answers quickly or
//! it is the wrong address.

use std::time::Duration;

/// Environment variable holding the backend base URL.
pub const BASE_URL_ENV: &str = "NOTESNAP_API_BASE_URL";

/// Default backend base URL for local development.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// TCP connect timeout for every request.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Overall request timeout.  Conversion can take a while for large
/// photos, so this is deliberately generous.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub base_url: String,
}

impl ClientConfig {
    /// Use an explicit base URL (trailing slash stripped).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Read the base URL from the environment, falling back to the
    /// local development default.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
