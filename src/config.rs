//! Client configuration
//!
//! `ClientConfig` holds everything a client needs: credentials, endpoint,
//! throttle and retry settings. It can be built in code, read from YAML, and
//! overlaid with environment variables.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.jquants.com/v2";

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "JQUANTS_API_KEY";
/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "JQUANTS_BASE_URL";
/// Environment variable forcing the equities master date
pub const ENV_MASTER_DATE: &str = "JQUANTS_MASTER_DATE";
/// Environment variable for the inter-request sleep (seconds)
pub const ENV_SLEEP_SEC: &str = "API_SLEEP_SEC";
/// Environment variable for the retry budget
pub const ENV_MAX_RETRIES: &str = "API_MAX_RETRIES";
/// Environment variable for the backoff base (seconds)
pub const ENV_BACKOFF_BASE: &str = "API_BACKOFF_BASE";

// ============================================================================
// ClientConfig
// ============================================================================

/// Configuration for a `JQuantsClient`
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API key sent as `x-api-key`
    pub api_key: Option<String>,
    /// API root, without trailing slash
    pub base_url: String,
    /// Date forced onto every equities master request
    pub master_date_override: Option<String>,
    /// Fixed sleep before every attempt, in seconds
    pub sleep_sec: f64,
    /// Attempts allowed per request
    pub max_retries: u32,
    /// Backoff base, in seconds
    pub backoff_base: f64,
    /// Max distinct entries kept by the single master lookup cache
    pub cache_capacity: usize,
    /// Timeout for single-record lookups, in seconds
    pub lookup_timeout_sec: f64,
    /// Timeout for each page of a paginated fetch, in seconds
    pub page_timeout_sec: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            master_date_override: None,
            sleep_sec: 0.6,
            max_retries: 6,
            backoff_base: 1.0,
            cache_capacity: 8192,
            lookup_timeout_sec: 15.0,
            page_timeout_sec: 30.0,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("master_date_override", &self.master_date_override)
            .field("sleep_sec", &self.sleep_sec)
            .field("max_retries", &self.max_retries)
            .field("backoff_base", &self.backoff_base)
            .field("cache_capacity", &self.cache_capacity)
            .field("lookup_timeout_sec", &self.lookup_timeout_sec)
            .field("page_timeout_sec", &self.page_timeout_sec)
            .finish()
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from YAML; missing fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config.normalized())
    }

    /// Read a YAML config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|name| std::env::var(name).ok())
    }

    /// Overlay values from a variable lookup; blank values are ignored
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(date) = get(ENV_MASTER_DATE) {
            self.master_date_override = Some(date);
        }
        if let Some(raw) = get(ENV_SLEEP_SEC) {
            self.sleep_sec = parse_var(ENV_SLEEP_SEC, &raw)?;
        }
        if let Some(raw) = get(ENV_MAX_RETRIES) {
            self.max_retries = parse_var(ENV_MAX_RETRIES, &raw)?;
        }
        if let Some(raw) = get(ENV_BACKOFF_BASE) {
            self.backoff_base = parse_var(ENV_BACKOFF_BASE, &raw)?;
        }

        *self = std::mem::take(self).normalized();
        Ok(())
    }

    /// Check that the config can drive a client
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        for (field, value) in [
            ("sleep_sec", self.sleep_sec),
            ("backoff_base", self.backoff_base),
            ("lookup_timeout_sec", self.lookup_timeout_sec),
            ("page_timeout_sec", self.page_timeout_sec),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_value(
                    field,
                    format!("must be a non-negative number of seconds, got {value}"),
                ));
            }
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(Error::invalid_value(
                    field,
                    format!("{value} seconds is out of range"),
                ));
            }
        }

        Ok(())
    }

    /// The API key, if one is configured and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Throttle applied before every attempt
    pub fn sleep_interval(&self) -> Duration {
        secs(self.sleep_sec)
    }

    /// Fixed wait after a transient error
    pub fn backoff_base_duration(&self) -> Duration {
        secs(self.backoff_base)
    }

    /// Timeout for single-record lookups
    pub fn lookup_timeout(&self) -> Duration {
        secs(self.lookup_timeout_sec)
    }

    /// Timeout for each page of a paginated fetch
    pub fn page_timeout(&self) -> Duration {
        secs(self.page_timeout_sec)
    }

    /// Build the URL of an endpoint path
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn normalized(mut self) -> Self {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        self.api_key = self
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self.master_date_override = self
            .master_date_override
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }
}

fn parse_var<T>(field: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| Error::invalid_value(field, format!("'{raw}': {e}")))
}

/// Negative and NaN values collapse to zero, huge ones saturate
fn secs(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(value).unwrap_or(Duration::MAX)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `ClientConfig`
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Force a date onto every equities master request
    pub fn master_date_override(mut self, date: impl Into<String>) -> Self {
        self.config.master_date_override = Some(date.into());
        self
    }

    /// Set the inter-request sleep
    pub fn sleep(mut self, interval: Duration) -> Self {
        self.config.sleep_sec = interval.as_secs_f64();
        self
    }

    /// Set the retry budget
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the backoff base
    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.config.backoff_base = base.as_secs_f64();
        self
    }

    /// Set the lookup cache capacity
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.config.cache_capacity = capacity;
        self
    }

    /// Set both request timeouts
    pub fn timeouts(mut self, lookup: Duration, page: Duration) -> Self {
        self.config.lookup_timeout_sec = lookup.as_secs_f64();
        self.config.page_timeout_sec = page.as_secs_f64();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config.normalized()
    }
}
