//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Per-connection read/write timeouts.
    pub timeouts: TimeoutConfig,

    /// Single-page application settings.
    pub frontend: FrontendConfig,

    /// Enables request logging and verbose output.
    pub debug: bool,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            timeouts: TimeoutConfig::default(),
            frontend: FrontendConfig::default(),
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Log filter directive used when `RUST_LOG` is not set.
    pub fn log_directive(&self) -> String {
        if self.debug {
            "basecoat_gateway=debug,tower_http=debug".to_string()
        } else {
            format!(
                "basecoat_gateway={},tower_http=warn",
                self.log_level.trim().to_ascii_lowercase()
            )
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Certificate and key used to terminate TLS.
    pub tls: TlsConfig,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: TlsConfig::default(),
        }
    }
}

/// TLS material for the listener. Plaintext serving is not supported.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TlsConfig {
    /// Path to certificate chain file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("localhost.crt"),
            key_path: PathBuf::from("localhost.key"),
        }
    }
}

/// Timeout configuration in seconds.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time allowed to receive a request body.
    pub read_secs: u64,

    /// Time allowed to produce and stream a response.
    pub write_secs: u64,
}

impl TimeoutConfig {
    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_secs)
    }

    pub fn write(&self) -> Duration {
        Duration::from_secs(self.write_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            read_secs: 15,
            write_secs: 15,
        }
    }
}

/// Single-page application configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FrontendConfig {
    /// Serve the frontend for non-RPC traffic.
    pub enable: bool,

    /// Directory holding the built frontend.
    pub assets_dir: PathBuf,

    /// Document returned for application routes (history mode).
    pub fallback_document: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            enable: true,
            assets_dir: PathBuf::from("frontend/public"),
            fallback_document: "index.html".to_string(),
        }
    }
}
