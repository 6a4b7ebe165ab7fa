//! Configuration for the authorization layer
//!
//! Loaded from TOML or JSON (selected by file extension), then merged with environment
//! overrides and validated:
//!
//! - `CHANUP_LOG` replaces the log filter directive
//! - `CHANUP_GUARD_OWNER` replaces the guard with a single-key policy for that address

mod policy;

pub use policy::GuardPolicy;

use crate::errors::{Result, UpgradeError};
use crate::types::AccountAddress;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the log filter
pub const ENV_LOG: &str = "CHANUP_LOG";

/// Environment variable overriding the guard with a single owner
pub const ENV_GUARD_OWNER: &str = "CHANUP_GUARD_OWNER";

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `chanup_authorization=debug`
    pub filter: String,
    /// Emit ANSI colours
    pub ansi: bool,
    /// Include the event target in output
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            ansi: true,
            with_target: false,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChanupConfig {
    /// Upgrader guard policy
    pub guard: GuardPolicy,
    /// Logging
    #[serde(default)]
    pub log: LogConfig,
}

impl ChanupConfig {
    /// Configuration with the given guard and default logging
    pub fn new(guard: GuardPolicy) -> Self {
        Self {
            guard,
            log: LogConfig::default(),
        }
    }

    /// Parse TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Parse JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from a `.toml` or `.json` file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            UpgradeError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(UpgradeError::config(format!(
                "Unsupported config file format: {}",
                path.display()
            ))),
        }
    }

    /// Load, merge process environment, and validate
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_file(path)?;
        config.merge_with_env()?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Merge overrides from the process environment
    pub fn merge_with_env(&mut self) -> Result<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Merge overrides from an explicit variable set
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            match key.as_str() {
                ENV_LOG => {
                    tracing::debug!(filter = %value, "log filter overridden by {ENV_LOG}");
                    self.log.filter = value;
                }
                ENV_GUARD_OWNER => {
                    let owner = AccountAddress::from_hex(&value).map_err(|e| {
                        UpgradeError::config(format!("Invalid address in {ENV_GUARD_OWNER}: {e}"))
                    })?;
                    tracing::info!(
                        %owner,
                        "guard replaced by single-key policy from {ENV_GUARD_OWNER}"
                    );
                    self.guard = GuardPolicy::SingleKey { owner };
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.log.filter.trim().is_empty() {
            return Err(UpgradeError::config("log filter must not be empty"));
        }
        self.guard.validate()
    }
}
