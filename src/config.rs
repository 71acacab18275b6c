//! Client configuration: backend base URL, request timeout and the login
//! entry point used for forced navigation on session expiry.

use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend API, including the `/api` prefix.
    pub base_url: String,
    pub timeout: Duration,
    /// Hard-redirect target when the session cannot be recovered.
    pub login_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl Config {
    /// Build a config from the environment, falling back to defaults.
    /// Recognized variables: `AULANET_API_BASE`, `AULANET_HTTP_TIMEOUT_SECS`,
    /// `AULANET_LOGIN_PATH`.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("AULANET_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout = std::env::var("AULANET_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let login_path =
            std::env::var("AULANET_LOGIN_PATH").unwrap_or_else(|_| DEFAULT_LOGIN_PATH.to_string());
        Self { base_url, timeout, login_path }
    }
}
