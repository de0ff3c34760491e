//! HTTP transport configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable names read by [`HttpConfig::from_env`].
pub mod vars {
    pub const CONNECT_TIMEOUT_MS: &str = "NETSERVICE_HTTP_CONNECT_TIMEOUT_MS";
    pub const REQUEST_TIMEOUT_MS: &str = "NETSERVICE_HTTP_REQUEST_TIMEOUT_MS";
    pub const USER_AGENT: &str = "NETSERVICE_HTTP_USER_AGENT";
    pub const GZIP: &str = "NETSERVICE_HTTP_GZIP";
}

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },
}

/// Inclusive range of statuses treated as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRange {
    pub min: u16,
    pub max: u16,
}

impl StatusRange {
    pub fn contains(&self, status: u16) -> bool {
        (self.min..=self.max).contains(&status)
    }
}

impl Default for StatusRange {
    fn default() -> Self {
        Self { min: 200, max: 399 }
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection timeout (ms).
    pub connect_timeout_ms: u64,
    /// Whole-request timeout (ms).
    pub request_timeout_ms: u64,
    /// User agent string.
    pub user_agent: String,
    /// Maximum idle connections per host.
    pub pool_max_idle_per_host: usize,
    /// Enable gzip decompression.
    pub gzip: bool,
    /// Statuses that resolve as success; anything else is an HTTP failure.
    pub success_status: StatusRange,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10_000,
            request_timeout_ms: 30_000,
            user_agent: format!("netservice/{}", env!("CARGO_PKG_VERSION")),
            pool_max_idle_per_host: 10,
            gzip: true,
            success_status: StatusRange::default(),
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Parse YAML. Missing keys take their defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: HttpConfig =
            serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load YAML from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Defaults overlaid with `NETSERVICE_HTTP_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env()
    }

    /// Overlay `NETSERVICE_HTTP_*` variables onto this config.
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(ms) = env_parse::<u64>(vars::CONNECT_TIMEOUT_MS)? {
            self.connect_timeout_ms = ms;
        }
        if let Some(ms) = env_parse::<u64>(vars::REQUEST_TIMEOUT_MS)? {
            self.request_timeout_ms = ms;
        }
        if let Ok(agent) = std::env::var(vars::USER_AGENT) {
            self.user_agent = agent;
        }
        if let Ok(gzip) = std::env::var(vars::GZIP) {
            self.gzip = matches!(gzip.to_lowercase().as_str(), "true" | "1" | "yes");
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = self.success_status;
        if range.min > range.max {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "success_status.min ({}) exceeds success_status.max ({})",
                    range.min, range.max
                ),
            });
        }
        if range.min < 100 || range.max > 599 {
            return Err(ConfigError::ValidationError {
                message: "success_status must lie within 100..=599".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::ValidationError {
                message: "request_timeout_ms must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(var: &str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            message: format!("expected integer, got {:?}", v),
        }),
        Err(_) => Ok(None),
    }
}
