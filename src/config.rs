//! Client configuration loaded from TOML.
//!
//! Resolution order for [`ClientConfig::load`]:
//! 1. an explicit path (must exist)
//! 2. `$BRREG_CONFIG` (must exist when set)
//! 3. `<config_dir>/brreg/config.toml`, e.g. `~/.config/brreg/config.toml`
//! 4. built-in defaults
//!
//! Every key is optional:
//!
//! ```toml
//! [client]
//! base_url = "https://data.brreg.no/enhetsregisteret/api"
//! timeout_secs = 10
//! rate_limit_ms = 500
//!
//! [cache]
//! ttl_secs = 600
//! max_entries = 10000
//!
//! [retry]
//! max_retries = 3
//!
//! [batch]
//! concurrency = 8
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::client::DEFAULT_BASE_URL;
use crate::{BrregError, Result};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "BRREG_CONFIG";

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub client: ConnectionConfig,
    pub cache: CacheSection,
    pub retry: RetrySection,
    pub batch: BatchSection,
}

/// Where and how requests are sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    /// API root (default: the public registry).
    pub base_url: String,
    /// Per-request timeout in seconds (default: 10).
    pub timeout_secs: u64,
    /// Minimum spacing between requests in milliseconds (default: none).
    pub rate_limit_ms: Option<u64>,
    /// Overrides the `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            rate_limit_ms: None,
            user_agent: None,
        }
    }
}

impl ConnectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rate_limit(&self) -> Option<Duration> {
        self.rate_limit_ms.map(Duration::from_millis)
    }
}

/// Response cache settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSection {
    /// Freshness window in seconds; unset disables caching.
    pub ttl_secs: Option<u64>,
    /// Entry cap (default: 10,000).
    pub max_entries: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            ttl_secs: None,
            max_entries: 10_000,
        }
    }
}

impl CacheSection {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}

/// Retry policy settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySection {
    /// Total attempt budget for transient failures (default: 0).
    pub max_retries: u32,
    pub multiplier_ms: u64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: 0,
            multiplier_ms: 1_000,
            min_delay_ms: 4_000,
            max_delay_ms: 10_000,
        }
    }
}

impl RetrySection {
    pub fn to_retry_config(&self) -> crate::RetryConfig {
        crate::RetryConfig::new()
            .max_retries(self.max_retries)
            .multiplier(Duration::from_millis(self.multiplier_ms))
            .min_delay(Duration::from_millis(self.min_delay_ms))
            .max_delay(Duration::from_millis(self.max_delay_ms))
    }
}

/// Batch fan-out settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchSection {
    /// Maximum in-flight requests per batch; unset means unbounded.
    pub concurrency: Option<usize>,
}

impl ClientConfig {
    /// Load configuration following the resolution order above.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path, std::env::var_os(CONFIG_ENV))? {
            Some(path) => Self::load_from_file(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BrregError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        let config = content.parse().map_err(|e: BrregError| {
            BrregError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })?;
        debug!(?path, "loaded config file");
        Ok(config)
    }

    fn resolve_config_path(
        explicit: Option<&Path>,
        env_value: Option<OsString>,
    ) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(BrregError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(value) = env_value.filter(|v| !v.is_empty()) {
            let path = PathBuf::from(value);
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(BrregError::Configuration(format!(
                "Config file from ${CONFIG_ENV} not found: {path:?}"
            )));
        }

        if let Some(dir) = dirs::config_dir() {
            let user_config = dir.join("brreg").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        Ok(None)
    }
}

impl FromStr for ClientConfig {
    type Err = BrregError;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| BrregError::Configuration(e.to_string()))
    }
}
