//! Structured logging.
//!
//! # Responsibilities
//! - Build the `tracing` subscriber from configuration
//! - Hand out an explicit [`Logger`] handle instead of installing a global
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured directive
//! - Debug mode enables `tower_http` request logs

use tracing::Dispatch;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

use crate::config::ServiceConfig;

/// Cloneable handle to a configured subscriber.
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Build a logger writing formatted events to stdout.
    pub fn new(config: &ServiceConfig) -> Self {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.log_directive()));

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer());

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// A logger that discards every event.
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Run `f` with this logger as the current subscriber.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
