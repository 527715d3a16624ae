//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TLS connection (axum-server)
//!     → server.rs (logger scope, request logging, timeouts)
//!     → headers.rs (cross-origin headers on every response)
//!     → dispatcher.rs (classify)
//!         RpcWeb   → rpc::RpcAdapter
//!         Ordinary → frontend::Frontend (if enabled) or 404
//! ```

pub mod dispatcher;
pub mod headers;
pub mod server;

pub use dispatcher::Dispatcher;
pub use server::{GatewayServer, ServeError};
