//! Basecoat gateway library.
//!
//! Serves gRPC-Web traffic and a single-page application from one TLS
//! listener. See [`http::GatewayServer`] for the entry point.

pub mod config;
pub mod frontend;
pub mod http;
pub mod net;
pub mod observability;
pub mod rpc;

pub use config::ServiceConfig;
pub use frontend::Frontend;
pub use http::{Dispatcher, GatewayServer};
pub use observability::Logger;
pub use rpc::{RpcAdapter, TrafficClass};
