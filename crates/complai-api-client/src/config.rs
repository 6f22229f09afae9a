//! ComplAI API client configuration.
//!
//! One base URL serves both the task and the client endpoints. The default
//! points at a locally running backend; override via environment variables
//! or explicit construction for staging/testing.

use url::Url;
use zeroize::Zeroizing;

/// Default backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/v1";

/// Configuration for connecting to the ComplAI backend.
///
/// Custom `Debug` implementation redacts the `api_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL all endpoint paths are appended to. Always ends in `/`.
    base_url: Url,
    /// Optional bearer token sent as `Authorization` on every request.
    pub api_token: Option<Zeroizing<String>>,
    /// Optional per-request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ApiConfig {
    /// Configuration for `base_url` with no token and no timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if `base_url` does not parse or
    /// cannot carry a path (e.g. `mailto:`).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            api_token: None,
            timeout_secs: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `VITE_REACT_APP_API_URL` (default: `http://localhost:3000/v1`)
    /// - `COMPLAI_API_TOKEN` (optional)
    /// - `COMPLAI_TIMEOUT_SECS` (optional; unset means no timeout)
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("VITE_REACT_APP_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_secs = match std::env::var("COMPLAI_TIMEOUT_SECS") {
            Ok(s) => Some(s.trim().parse().map_err(|_| ConfigError::InvalidTimeout(s))?),
            Err(_) => None,
        };
        Ok(Self {
            base_url: parse_base_url("VITE_REACT_APP_API_URL", &raw)?,
            api_token: std::env::var("COMPLAI_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty())
                .map(Zeroizing::new),
            timeout_secs,
        })
    }

    /// Create a configuration pointing to a local server on `port` (for
    /// testing against the stub backend).
    pub fn local(port: u16) -> Result<Self, ConfigError> {
        Self::new(&format!("http://127.0.0.1:{port}/v1"))
    }

    /// Point the configuration at a different backend, keeping token and
    /// timeout.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url("base_url", base_url)?;
        Ok(self)
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Zeroizing::new(token.into()));
        self
    }

    /// Set a request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// The normalised base URL (trailing `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for an endpoint path such as `tasks/create-task`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn parse_base_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            var.to_string(),
            "URL cannot be used as a base".to_string(),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("API token contains characters not allowed in an HTTP header")]
    InvalidToken,
    #[error("COMPLAI_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let cfg = ApiConfig::new("http://localhost:3000/v1").unwrap();
        assert_eq!(cfg.base_url().as_str(), "http://localhost:3000/v1/");
        assert_eq!(
            cfg.endpoint("tasks/create-task"),
            "http://localhost:3000/v1/tasks/create-task"
        );
        assert_eq!(
            cfg.endpoint("/clients"),
            "http://localhost:3000/v1/clients"
        );
    }

    #[test]
    fn local_builds_valid_config() {
        let cfg = ApiConfig::local(9000).unwrap();
        assert_eq!(cfg.base_url().as_str(), "http://127.0.0.1:9000/v1/");
        assert!(cfg.api_token.is_none());
        assert!(cfg.timeout_secs.is_none());
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(ApiConfig::new("not a url").is_err());
        assert!(ApiConfig::new("mailto:ops@example.com").is_err());
    }

    #[test]
    fn with_base_url_keeps_credentials() {
        let cfg = ApiConfig::local(9000)
            .unwrap()
            .with_token("t")
            .with_timeout_secs(5)
            .with_base_url("https://api.complai.example/v2")
            .unwrap();
        assert_eq!(cfg.base_url().as_str(), "https://api.complai.example/v2/");
        assert_eq!(cfg.api_token.as_deref().map(String::as_str), Some("t"));
        assert_eq!(cfg.timeout_secs, Some(5));
    }

    // The only test in this crate that touches the process environment.
    #[test]
    fn from_env_reads_url_token_and_timeout() {
        std::env::set_var("VITE_REACT_APP_API_URL", "http://backend.internal:8080/v1");
        std::env::set_var("COMPLAI_API_TOKEN", "  ");
        std::env::set_var("COMPLAI_TIMEOUT_SECS", "30");
        let cfg = ApiConfig::from_env().unwrap();
        assert_eq!(cfg.base_url().as_str(), "http://backend.internal:8080/v1/");
        assert!(cfg.api_token.is_none());
        assert_eq!(cfg.timeout_secs, Some(30));

        std::env::set_var("COMPLAI_TIMEOUT_SECS", "soon");
        assert!(matches!(
            ApiConfig::from_env(),
            Err(ConfigError::InvalidTimeout(_))
        ));

        std::env::remove_var("VITE_REACT_APP_API_URL");
        std::env::remove_var("COMPLAI_API_TOKEN");
        std::env::remove_var("COMPLAI_TIMEOUT_SECS");
        let cfg = ApiConfig::from_env().unwrap();
        assert_eq!(cfg.base_url().as_str(), "http://localhost:3000/v1/");
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = ApiConfig::local(9000).unwrap().with_token("secret-token");
        let printed = format!("{cfg:?}");
        assert!(printed.contains("[REDACTED]"));
        assert!(!printed.contains("secret-token"));
    }
}
