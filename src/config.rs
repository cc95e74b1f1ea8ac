//! Configuration
//!
//! Read from `~/.checkin/config.toml` (relocatable with `CHECKIN_HOME`, or
//! replaced with `--config`). Every field is optional; a missing file means
//! defaults, which in turn means no webhook and local-only check-ins.
//!
//! ```toml
//! [webhook]
//! url = "https://example.org/hooks/checkin"
//! timeout_secs = 5
//!
//! [webhook.retry]
//! max_attempts = 1
//! backoff_ms = 500
//!
//! [scan]
//! missing_identity = "post-error"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::RetryPolicy;
use crate::core::services::MissingIdentityPolicy;
use crate::paths;

/// Environment variable overriding `webhook.url`
pub const WEBHOOK_URL_ENV: &str = "CHECKIN_WEBHOOK_URL";

/// Upper bound for `webhook.timeout_secs`
pub const MAX_TIMEOUT_SECS: u64 = 300;

/// Upper bound for `webhook.retry.max_attempts`
pub const MAX_ATTEMPTS: u32 = 10;

/// Upper bound for `webhook.retry.backoff_ms`
pub const MAX_BACKOFF_MS: u64 = 60_000;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        /// Config file path
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// The webhook URL does not parse
    #[error("invalid webhook url {url:?}: {reason}")]
    InvalidUrl {
        /// The offending value
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A numeric setting is outside the range the notifier can work with
    #[error("invalid config value {field} = {value}: must be between {min} and {max}")]
    OutOfRange {
        /// Dotted key of the setting
        field: &'static str,
        /// The offending value
        value: u64,
        /// Smallest accepted value
        min: u64,
        /// Largest accepted value
        max: u64,
    },

    /// The HTTP client could not be built
    #[error("failed to build http client: {0}")]
    Client(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Outbound notification settings
    #[serde(default)]
    pub webhook: WebhookConfig,
    /// Scan handling settings
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Where and how check-ins are posted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint URL; absent means local-only mode
    #[serde(default, alias = "hrbot_url", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Opt-in retries for failed posts
    #[serde(default)]
    pub retry: RetryConfig,
}

const fn default_timeout_secs() -> u64 {
    5
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry settings; the default is one attempt and no retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per payload
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

const fn default_max_attempts() -> u32 {
    1
}

const fn default_backoff_ms() -> u64 {
    500
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

/// Scan handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// What to do with scans that decode to nothing
    #[serde(default)]
    pub missing_identity: MissingIdentityPolicy,
}

impl Config {
    /// Default config file location
    #[must_use]
    pub fn default_path() -> PathBuf {
        paths::config_file()
    }

    /// Load from `path`, falling back to defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.webhook.validate()?;
        Ok(config)
    }

    /// Load from `path` and apply environment overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.override_url(std::env::var(WEBHOOK_URL_ENV).ok());
        Ok(config)
    }

    /// Replace the webhook URL when an override is given
    pub fn override_url(&mut self, url: Option<String>) {
        if let Some(url) = url {
            self.webhook.url = Some(url);
        }
    }
}

impl WebhookConfig {
    /// The parsed endpoint, `None` when unset or blank
    pub fn endpoint(&self) -> Result<Option<Url>, ConfigError> {
        let Some(raw) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
            return Ok(None);
        };
        let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(Some(url)),
            other => Err(ConfigError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme {other}"),
            }),
        }
    }

    /// Check the numeric settings against their accepted ranges
    ///
    /// A zero timeout would fail every request, so it is rejected like any
    /// other out-of-range value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("webhook.timeout_secs", self.timeout_secs, 1, MAX_TIMEOUT_SECS)?;
        check_range(
            "webhook.retry.max_attempts",
            u64::from(self.retry.max_attempts),
            1,
            u64::from(MAX_ATTEMPTS),
        )?;
        check_range("webhook.retry.backoff_ms", self.retry.backoff_ms, 0, MAX_BACKOFF_MS)
    }

    /// Per-request timeout
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Longest one payload can take across all of its attempts
    #[must_use]
    pub fn delivery_budget(&self) -> Duration {
        let attempts = self.retry.max_attempts.max(1);
        self.timeout()
            .saturating_mul(attempts)
            .saturating_add(Duration::from_millis(self.retry.backoff_ms).saturating_mul(attempts - 1))
    }

    /// Retry policy for the notifier
    #[must_use]
    pub const fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            backoff: Duration::from_millis(self.retry.backoff_ms),
        }
    }
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}
