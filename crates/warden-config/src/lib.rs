//! Configuration management for Warden
//!
//! Provides hierarchical configuration loading from multiple sources:
//! 1. CLI arguments (highest precedence, applied by the caller)
//! 2. Environment variables (`WARDEN_*` prefix, `__` between sections)
//! 3. warden.local.toml (gitignored, local overrides)
//! 4. warden.toml (git-tracked, project config)
//! 5. ~/.config/warden/config.toml (user defaults)
//! 6. Built-in defaults (lowest precedence)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod error;
mod loader;
mod paths;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use paths::Paths;

/// Largest accepted UTC offset for time conditions.
const MAX_UTC_OFFSET_MINUTES: i32 = 24 * 60;

/// Main Warden configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    pub authorization: AuthorizationConfig,
    pub sources: SourcesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationConfig {
    /// Make ABAC denials final instead of falling back to RBAC.
    pub abac_only: bool,
    pub policy_cache_ttl_secs: u64,
    /// Offset from UTC used to compute the `HH:MM` seen by time conditions.
    pub condition_utc_offset_minutes: i32,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            abac_only: false,
            policy_cache_ttl_secs: 60,
            condition_utc_offset_minutes: 0,
        }
    }
}

impl AuthorizationConfig {
    pub fn policy_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.policy_cache_ttl_secs)
    }

    pub fn condition_utc_offset_secs(&self) -> i32 {
        self.condition_utc_offset_minutes * 60
    }
}

/// Where the CLI reads policy and role fixtures from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub policies: PathBuf,
    pub roles: PathBuf,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            policies: PathBuf::from("policies.json"),
            roles: PathBuf::from("roles.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl WardenConfig {
    /// Reject values that would break the evaluator.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.authorization.policy_cache_ttl_secs == 0 {
            return Err(ConfigError::ValidationError(
                "authorization.policy_cache_ttl_secs must be greater than 0".to_string(),
            ));
        }

        let offset = self.authorization.condition_utc_offset_minutes;
        if offset.abs() >= MAX_UTC_OFFSET_MINUTES {
            return Err(ConfigError::ValidationError(format!(
                "authorization.condition_utc_offset_minutes must be within ±{}, got {offset}",
                MAX_UTC_OFFSET_MINUTES - 1
            )));
        }

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve relative paths to absolute
    pub fn resolve_paths(&mut self, base_dir: impl AsRef<Path>) {
        let base = base_dir.as_ref();

        if self.sources.policies.is_relative() {
            self.sources.policies = base.join(&self.sources.policies);
        }

        if self.sources.roles.is_relative() {
            self.sources.roles = base.join(&self.sources.roles);
        }
    }
}
