//! Messaging Configuration Module
//!
//! Provides configuration loading for the messaging runtime.
//! Supports loading from TOML files with environment variable overrides.

use anyhow::{bail, Context, Result};
use codec::{DEFAULT_MAX_FRAME_SIZE, FRAME_HEADER_SIZE};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Prefix of environment overrides, e.g. `MESSAGING__TRANSPORT__MAX_FRAME_SIZE`
pub const ENV_PREFIX: &str = "MESSAGING";

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/messaging.toml";

/// Main configuration structure
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct MessagingConfig {
    /// Log output
    pub logging: LoggingSettings,

    /// Channel buffering and limits
    pub transport: TransportSettings,

    /// Secure-channel material, carried for the session layer
    pub session: SessionSettings,
}

/// Logging settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `messaging_actors=trace`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

/// Transport settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct TransportSettings {
    /// Bytes requested per `read_some` call
    pub read_chunk_size: usize,
    /// Largest accepted frame payload
    pub max_frame_size: usize,
}

/// Secure-channel settings
///
/// Paths are kept as given; nothing here opens or parses them.
#[derive(Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SessionSettings {
    /// Certificate chain file (PEM)
    pub certificate: Option<String>,
    /// Private key file (PEM)
    pub key: Option<String>,
    /// Passphrase for an encrypted private key
    pub passphrase: Option<String>,
    /// File of trusted CA certificates
    pub cafile: Option<String>,
    /// Directory of trusted CA certificates
    pub capath: Option<String>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            read_chunk_size: 64 * 1024, // 64KB
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl TransportSettings {
    pub fn validate(&self) -> Result<()> {
        if self.read_chunk_size == 0 {
            bail!("transport.read_chunk_size must be greater than zero");
        }
        if self.max_frame_size < FRAME_HEADER_SIZE {
            bail!(
                "transport.max_frame_size must be at least {} bytes, got {}",
                FRAME_HEADER_SIZE,
                self.max_frame_size
            );
        }
        Ok(())
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

impl SessionSettings {
    /// Peers must present valid certificates when any certificate material is configured
    pub fn authentication_enabled(&self) -> bool {
        is_set(&self.certificate) || is_set(&self.key) || is_set(&self.cafile) || is_set(&self.capath)
    }
}

impl fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSettings")
            .field("certificate", &self.certificate)
            .field("key", &self.key)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("cafile", &self.cafile)
            .field("capath", &self.capath)
            .finish()
    }
}

impl MessagingConfig {
    /// Load configuration from a TOML file with environment overrides
    ///
    /// A missing file at the default location is not an error; an explicitly
    /// given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_PATH), false),
        };
        info!("Loading messaging config: {:?}", file);

        let builder = Config::builder()
            .add_source(File::from(file).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Parse an in-memory TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()
            .context("Failed to parse configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.transport.validate()?;
        if self.session.passphrase.is_some() && !is_set(&self.session.key) {
            debug!("session.passphrase is set without session.key; it will be ignored");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = MessagingConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.transport.max_frame_size, DEFAULT_MAX_FRAME_SIZE);
        assert!(!config.session.authentication_enabled());
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = MessagingConfig::from_toml_str(
            r#"
[transport]
max_frame_size = 4096
"#,
        )
        .unwrap();

        assert_eq!(config.transport.max_frame_size, 4096);
        assert_eq!(config.transport.read_chunk_size, 64 * 1024);
        assert_eq!(config.logging, LoggingSettings::default());
    }

    #[test]
    fn test_invalid_transport_rejected() {
        let err = MessagingConfig::from_toml_str(
            r#"
[transport]
read_chunk_size = 0
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("read_chunk_size"));

        assert!(MessagingConfig::from_toml_str("[transport]\nmax_frame_size = 8\n").is_err());

        let smallest = TransportSettings {
            max_frame_size: FRAME_HEADER_SIZE,
            ..Default::default()
        };
        smallest.validate().unwrap();
        let below = TransportSettings {
            max_frame_size: FRAME_HEADER_SIZE - 1,
            ..Default::default()
        };
        assert!(below.validate().is_err());
    }

    #[test]
    fn test_authentication_enabled_by_any_material() {
        let mut session = SessionSettings::default();
        session.passphrase = Some("12345".to_string());
        assert!(!session.authentication_enabled());

        session.cafile = Some(String::new());
        assert!(!session.authentication_enabled());

        session.cafile = Some("ca.pem".to_string());
        assert!(session.authentication_enabled());
    }

    #[test]
    fn test_passphrase_redacted() {
        let session = SessionSettings {
            passphrase: Some("12345".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("12345"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("messaging.toml");

        fs::write(
            &config_path,
            r#"
[logging]
level = "debug"
json = true

[session]
certificate = "cert.1.pem"
key = "key.1.enc.pem"
passphrase = "12345"
"#,
        )
        .unwrap();

        let config = MessagingConfig::load(Some(&config_path)).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert!(config.session.authentication_enabled());
        assert_eq!(config.session.key.as_deref(), Some("key.1.enc.pem"));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(MessagingConfig::load(Some(&missing)).is_err());
    }
}
