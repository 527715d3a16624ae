//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServiceConfig.listener.tls
//!     → tls.rs (read + parse PEM material, build rustls config)
//!     → axum-server TLS acceptor (owned by http::server)
//! ```
//!
//! # Design Decisions
//! - TLS is mandatory; there is no plaintext listener
//! - Material is read once at startup; any problem is fatal

pub mod tls;

pub use tls::{load_tls_config, TlsError};
