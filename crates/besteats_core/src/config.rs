//! Core configuration.
//!
//! # Responsibility
//! - Describe storage, logging and search settings supplied by the host.
//! - Validate settings before any subsystem starts.
//!
//! # Invariants
//! - A config that fails `validate()` must never reach `BestEatsCore::open`'s
//!   storage or logging bootstrap.

use crate::db::IN_MEMORY_PATH;
use crate::logging::default_log_level;
use crate::model::category::FoodCategory;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

/// Kakao local keyword search endpoint.
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://dapi.kakao.com/v2/local/search/keyword.json";
const DEFAULT_RADIUS_M: u32 = 2_000;
const MAX_RADIUS_M: u32 = 20_000;
const DEFAULT_PAGE_SIZE: u32 = 15;
const MAX_PAGE_SIZE: u32 = 15;
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    RadiusOutOfRange(u32),
    PageSizeOutOfRange(u32),
    ZeroTimeout,
    EmptyEndpoint,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "db_path cannot be empty"),
            Self::RadiusOutOfRange(value) => {
                write!(f, "search.radius_m must be in 1..={MAX_RADIUS_M}, got {value}")
            }
            Self::PageSizeOutOfRange(value) => {
                write!(f, "search.page_size must be in 1..={MAX_PAGE_SIZE}, got {value}")
            }
            Self::ZeroTimeout => write!(f, "search.timeout_ms must be greater than zero"),
            Self::EmptyEndpoint => write!(f, "search.endpoint cannot be empty"),
        }
    }
}

impl Error for ConfigError {}

/// Place search settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub radius_m: u32,
    pub page_size: u32,
    pub timeout_ms: u64,
    pub endpoint: String,
    /// REST API key; the HTTP client is unavailable without one.
    pub api_key: Option<String>,
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            endpoint: DEFAULT_SEARCH_ENDPOINT.to_string(),
            api_key: None,
        }
    }
}

/// Top-level settings for [`crate::app::BestEatsCore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite file; `:memory:` selects an in-memory store.
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute log directory. Logging is left untouched when `None`.
    pub log_dir: Option<PathBuf>,
    pub default_category: FoodCategory,
    pub search: SearchConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(IN_MEMORY_PATH),
            log_level: default_log_level().to_string(),
            log_dir: None,
            default_category: FoodCategory::default(),
            search: SearchConfig::default(),
        }
    }
}

impl CoreConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        let search = &self.search;
        if search.radius_m == 0 || search.radius_m > MAX_RADIUS_M {
            return Err(ConfigError::RadiusOutOfRange(search.radius_m));
        }
        if search.page_size == 0 || search.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::PageSizeOutOfRange(search.page_size));
        }
        if search.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if search.endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use crate::model::category::FoodCategory;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(CoreConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: CoreConfig = serde_json::from_str(
            r#"{"db_path": "/tmp/besteats.sqlite3", "default_category": "korean", "search": {"radius_m": 500}}"#,
        )
        .expect("config should deserialize");
        assert_eq!(config.default_category, FoodCategory::Korean);
        assert_eq!(config.search.radius_m, 500);
        assert_eq!(config.search.page_size, 15);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_out_of_range_search_settings() {
        let mut config = CoreConfig::default();
        config.search.radius_m = 50_000;
        assert_eq!(config.validate(), Err(ConfigError::RadiusOutOfRange(50_000)));

        let mut config = CoreConfig::default();
        config.search.page_size = 0;
        assert_eq!(config.validate(), Err(ConfigError::PageSizeOutOfRange(0)));

        let mut config = CoreConfig::default();
        config.search.timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}
