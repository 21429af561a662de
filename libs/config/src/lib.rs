//! # Messaging Configuration
//!
//! Centralized configuration and logging setup for the messaging runtime.
//!
//! ## Features
//!
//! - **Transport Settings**: Read chunk size and frame size limits for channels
//! - **Session Settings**: Certificate material handed to the secure-channel layer
//! - **Logging**: `tracing-subscriber` initialisation from configuration
//!
//! ## Usage
//!
//! ```rust
//! use messaging_config::{MessagingConfig, init_tracing};
//!
//! let config = MessagingConfig::from_toml_str("[logging]\nlevel = \"debug\"\n").unwrap();
//! init_tracing(&config.logging).unwrap();
//! assert!(!config.session.authentication_enabled());
//! ```

pub mod logging;
pub mod settings;

// Re-export commonly used types
pub use logging::init_tracing;
pub use settings::{
    LoggingSettings, MessagingConfig, SessionSettings, TransportSettings, DEFAULT_CONFIG_PATH,
    ENV_PREFIX,
};
