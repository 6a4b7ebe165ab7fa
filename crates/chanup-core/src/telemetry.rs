//! Tracing subscriber setup

use crate::config::{LogConfig, ENV_LOG};
use crate::errors::{Result, UpgradeError};
use tracing_subscriber::EnvFilter;

/// Build the filter: `CHANUP_LOG` wins over the configured directive
pub fn env_filter(config: &LogConfig) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(ENV_LOG) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.filter).map_err(|e| {
            UpgradeError::config(format!("Invalid log filter {:?}: {e}", config.filter))
        }),
    }
}

/// Install the global fmt subscriber
///
/// A subscriber installed earlier (e.g. by a test harness) is left in place.
pub fn init_tracing(config: &LogConfig) -> Result<()> {
    let filter = env_filter(config)?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .with_target(config.with_target)
        .try_init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_tolerated() {
        let config = LogConfig {
            filter: "warn".to_string(),
            ansi: false,
            with_target: true,
        };
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }
}
