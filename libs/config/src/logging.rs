//! Logging Initialisation
//!
//! Installs the process-wide `tracing` subscriber from [`LoggingSettings`].
//! `RUST_LOG`, when set, takes precedence over the configured level.

use crate::settings::LoggingSettings;
use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber
///
/// Returns `Ok(false)` when a global subscriber was already installed, which
/// happens routinely in tests.
pub fn init_tracing(settings: &LoggingSettings) -> Result<bool> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("Invalid log level directive '{}'", settings.level))?,
    };

    let installed = if settings.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    };

    Ok(installed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_tolerated() {
        let settings = LoggingSettings::default();
        init_tracing(&settings).unwrap();
        // the global subscriber is now set either way
        assert!(!init_tracing(&settings).unwrap());
    }

    #[test]
    fn test_invalid_directive_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = LoggingSettings {
            level: "messaging_actors=notalevel".to_string(),
            json: false,
        };
        assert!(init_tracing(&settings).is_err());
    }
}
