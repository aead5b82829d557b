//! Dispatcher configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is valid.

use crate::error::ConfigError;
use activity_mentions::DEFAULT_SCAN_LIMIT;
use activity_store::{ACTIVITIES_COLLECTION, DEFAULT_MAX_BATCH_OPS, USERS_COLLECTION};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Collection holding activity records
    pub activities_collection: String,
    /// Collection holding `{ id, username }` user documents
    pub users_collection: String,
    /// Content with more `user/` occurrences than this is not scanned
    pub mention_scan_limit: usize,
    /// Largest batch a branch may commit
    pub max_batch_ops: usize,
    /// Username cache settings
    pub user_cache: UserCacheConfig,
}

/// Username cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserCacheConfig {
    pub enabled: bool,
    pub capacity: u64,
    pub ttl_secs: u64,
}

impl Default for UserCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 10_000,
            ttl_secs: 300,
        }
    }
}

impl UserCacheConfig {
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            activities_collection: ACTIVITIES_COLLECTION.to_string(),
            users_collection: USERS_COLLECTION.to_string(),
            mention_scan_limit: DEFAULT_SCAN_LIMIT,
            max_batch_ops: DEFAULT_MAX_BATCH_OPS,
            user_cache: UserCacheConfig::default(),
        }
    }
}

impl DispatcherConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or a value is out of range
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or does not validate
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded dispatcher config from {}", path.display());
        Self::from_toml_str(&raw)
    }

    /// Render as TOML
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject empty collection names and zero limits
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first bad field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.activities_collection.trim().is_empty() {
            return Err(invalid("activities_collection", "must not be empty"));
        }
        if self.users_collection.trim().is_empty() {
            return Err(invalid("users_collection", "must not be empty"));
        }
        if self.mention_scan_limit == 0 {
            return Err(invalid("mention_scan_limit", "must be greater than zero"));
        }
        if self.max_batch_ops == 0 {
            return Err(invalid("max_batch_ops", "must be greater than zero"));
        }
        if self.user_cache.enabled && self.user_cache.capacity == 0 {
            return Err(invalid("user_cache.capacity", "must be greater than zero when the cache is enabled"));
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn with_activities_collection(mut self, name: impl Into<String>) -> Self {
        self.activities_collection = name.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_users_collection(mut self, name: impl Into<String>) -> Self {
        self.users_collection = name.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_mention_scan_limit(mut self, limit: usize) -> Self {
        self.mention_scan_limit = limit;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_batch_ops(mut self, max: usize) -> Self {
        self.max_batch_ops = max;
        self
    }

    /// With the username cache turned off
    #[inline]
    #[must_use]
    pub fn without_user_cache(mut self) -> Self {
        self.user_cache.enabled = false;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_user_cache(mut self, capacity: u64, ttl_secs: u64) -> Self {
        self.user_cache = UserCacheConfig {
            enabled: true,
            capacity,
            ttl_secs,
        };
        self
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
