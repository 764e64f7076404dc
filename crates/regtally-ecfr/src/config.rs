//! eCFR client configuration.
//!
//! Configures the catalog base URL and the default request timeout.
//! Defaults point to the public eCFR service. Override via environment
//! variables or explicit construction for staging/testing.

use std::time::Duration;

use url::Url;

/// Public eCFR service.
pub const DEFAULT_BASE_URL: &str = "https://www.ecfr.gov";

/// Default request timeout in seconds. Full title XML for the larger titles
/// takes minutes to render upstream.
pub const DEFAULT_TIMEOUT_SECS: u64 = 240;

/// Configuration for connecting to the eCFR service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcfrConfig {
    /// Base URL of the service. Default: <https://www.ecfr.gov>
    pub base_url: Url,
    /// Client-wide timeout in seconds. Individual requests may override it.
    pub timeout_secs: u64,
}

impl EcfrConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ECFR_BASE_URL` (default: `https://www.ecfr.gov`)
    /// - `ECFR_TIMEOUT_SECS` (default: 240)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_url("ECFR_BASE_URL", DEFAULT_BASE_URL)?;
        let timeout_secs = match std::env::var("ECFR_TIMEOUT_SECS") {
            Ok(raw) => parse_timeout(&raw)?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            base_url,
            timeout_secs,
        })
    }

    /// Point the client at an arbitrary base URL (mock servers, mirrors).
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(base_url.to_string(), e.to_string()))?;
        Ok(Self {
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        })
    }

    /// The client-wide timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A base URL did not parse.
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    /// The timeout was not a positive integer.
    #[error("invalid timeout \"{0}\": expected a positive number of seconds")]
    InvalidTimeout(String),
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}
