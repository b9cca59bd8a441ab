//! Backend connection configuration.

use std::env;
use std::time::Duration;

/// Default base URL of the Rasa server.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5005";

/// Default per-request timeout towards the backend, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for reaching the conversational backend.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g. "http://localhost:5005").
    pub base_url: String,
    /// Timeout applied to each outbound request.
    pub timeout: Duration,
    /// Skip TLS certificate verification (self-signed dev servers).
    pub accept_invalid_certs: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            accept_invalid_certs: false,
        }
    }
}

impl BackendConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                       | Default                 |
    /// |--------------------------------|-------------------------|
    /// | `BACKEND_URL`                  | `http://localhost:5005` |
    /// | `BACKEND_TIMEOUT_SECS`         | `10`                    |
    /// | `BACKEND_ACCEPT_INVALID_CERTS` | `false`                 |
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.into()),
            timeout: Duration::from_secs(
                env::var("BACKEND_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            accept_invalid_certs: env::var("BACKEND_ACCEPT_INVALID_CERTS")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
