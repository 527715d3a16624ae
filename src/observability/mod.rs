//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! main
//!     → logging.rs (build Logger from ServiceConfig)
//!     → GatewayServer (startup future + every request scoped to the Logger)
//! ```
//!
//! # Design Decisions
//! - Structured logging through `tracing`
//! - No process-wide default subscriber; the handle is passed explicitly

pub mod logging;

pub use logging::Logger;
