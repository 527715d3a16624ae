//! RPC-over-HTTP boundary.
//!
//! # Data Flow
//! ```text
//! Request headers
//!     → classifier.rs (RpcWeb or Ordinary, headers only)
//!     → RpcAdapter::serve (opaque gRPC-Web server) when RpcWeb
//! ```
//!
//! # Design Decisions
//! - The dispatcher only sees the `RpcAdapter` trait, never a concrete server
//! - Adapter errors are the adapter's own; nothing here retries or rewrites them

pub mod classifier;
pub mod unimplemented;

use std::convert::Infallible;

use axum::{body::Body, extract::Request, response::Response};
use futures_util::future::BoxFuture;
use tower::{Service, ServiceExt};

pub use classifier::{classify, TrafficClass};
pub use unimplemented::UnimplementedRpc;

/// Opaque RPC server capable of answering gRPC-Web requests.
pub trait RpcAdapter: Send + Sync + 'static {
    /// Returns true if the request should be handed to [`RpcAdapter::serve`].
    fn is_rpc_web_request(&self, req: &Request) -> bool {
        classify(req.headers()) == TrafficClass::RpcWeb
    }

    /// Handle the request fully, producing a complete response.
    fn serve(&self, req: Request) -> BoxFuture<'static, Response>;
}

/// Adapts any infallible tower service (e.g. a gRPC-Web router) to [`RpcAdapter`].
#[derive(Debug, Clone)]
pub struct ServiceAdapter<S> {
    inner: S,
}

impl<S> ServiceAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

impl<S> RpcAdapter for ServiceAdapter<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + Sync + 'static,
    S::Future: Send + 'static,
{
    fn serve(&self, req: Request) -> BoxFuture<'static, Response> {
        let svc = self.inner.clone();
        Box::pin(async move {
            match svc.oneshot(req).await {
                Ok(response) => response,
                Err(never) => match never {},
            }
        })
    }
}
