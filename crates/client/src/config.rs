//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `BISTRO_BASE_URL` - Restaurant site origin (default: `http://127.0.0.1:5000`)
//! - `BISTRO_LOGIN_PATH` - Login page path (default: `/otp_login`)
//! - `BISTRO_SESSION_FILE` - File backing session storage (default: `.bistro-session.json`)
//! - `BISTRO_SESSION_COOKIE` - `Cookie` header value of a logged-in browser session
//! - `BISTRO_REQUEST_TIMEOUT_SECS` - Per-request timeout; unset means no timeout
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_LOGIN_PATH: &str = "/otp_login";
const DEFAULT_SESSION_FILE: &str = ".bistro-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Ordering client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    /// Origin every API path is resolved against
    pub base_url: Url,
    /// Where unauthenticated users are sent
    pub login_path: String,
    /// File used for session-scoped storage outside a browser
    pub session_file: PathBuf,
    /// Cookie header forwarded with every request
    pub session_cookie: Option<SecretString>,
    /// Request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("login_path", &self.login_path)
            .field("session_file", &self.session_file)
            .field(
                "session_cookie",
                &self.session_cookie.as_ref().map(|_| "[REDACTED]"),
            )
            .field("request_timeout", &self.request_timeout)
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("BISTRO_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BISTRO_BASE_URL".to_string(), e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidEnvVar(
                "BISTRO_BASE_URL".to_string(),
                "must be an absolute http(s) URL".to_string(),
            ));
        }

        let login_path =
            lookup("BISTRO_LOGIN_PATH").unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());
        if !login_path.starts_with('/') {
            return Err(ConfigError::InvalidEnvVar(
                "BISTRO_LOGIN_PATH".to_string(),
                "must start with '/'".to_string(),
            ));
        }

        let session_file = lookup("BISTRO_SESSION_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE), PathBuf::from);

        let session_cookie = lookup("BISTRO_SESSION_COOKIE")
            .filter(|v| !v.is_empty())
            .map(SecretString::from);

        let request_timeout = lookup("BISTRO_REQUEST_TIMEOUT_SECS")
            .map(|v| {
                v.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "BISTRO_REQUEST_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        let sentry_dsn = lookup("SENTRY_DSN").filter(|v| !v.is_empty());

        Ok(Self {
            base_url,
            login_path,
            session_file,
            session_cookie,
            request_timeout,
            sentry_dsn,
        })
    }

    /// Absolute URL of the login page.
    #[must_use]
    pub fn login_url(&self) -> String {
        self.base_url
            .join(&self.login_path)
            .map_or_else(|_| self.login_path.clone(), String::from)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.login_path, "/otp_login");
        assert_eq!(config.session_file, PathBuf::from(".bistro-session.json"));
        assert!(config.session_cookie.is_none());
        assert!(config.request_timeout.is_none());
        assert_eq!(config.login_url(), "http://127.0.0.1:5000/otp_login");
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("BISTRO_BASE_URL", "https://bistro.example.com"),
            ("BISTRO_LOGIN_PATH", "/login"),
            ("BISTRO_SESSION_COOKIE", "session=abc"),
            ("BISTRO_REQUEST_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.login_url(), "https://bistro.example.com/login");
        assert_eq!(
            config.session_cookie.unwrap().expose_secret(),
            "session=abc"
        );
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup_from(&[("BISTRO_BASE_URL", "not a url")])),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup_from(&[("BISTRO_LOGIN_PATH", "otp_login")])),
            Err(ConfigError::InvalidEnvVar(..))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup_from(&[("BISTRO_REQUEST_TIMEOUT_SECS", "soon")])),
            Err(ConfigError::InvalidEnvVar(..))
        ));
    }

    #[test]
    fn test_debug_redacts_cookie() {
        let config = ClientConfig::from_lookup(lookup_from(&[(
            "BISTRO_SESSION_COOKIE",
            "session=super_secret_cookie",
        )]))
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_cookie"));
    }
}
