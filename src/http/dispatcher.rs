//! Combined dispatcher.
//!
//! # Responsibilities
//! - Classify each request through the RPC adapter
//! - Forward gRPC-Web traffic to the adapter untouched
//! - Send everything else to the frontend, or 404 when it is disabled
//!
//! # Design Decisions
//! - Depends only on the `RpcAdapter` trait and `Frontend`
//! - Immutable after construction (thread-safe without locks)

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    response::Response,
    Router,
};

use crate::frontend::{file_server, Frontend};
use crate::rpc::RpcAdapter;

/// Single entry point for every request on the listener.
#[derive(Clone)]
pub struct Dispatcher {
    rpc: Arc<dyn RpcAdapter>,
    frontend: Option<Arc<Frontend>>,
}

impl Dispatcher {
    /// Dispatcher with no frontend: ordinary traffic gets the routing 404.
    pub fn new(rpc: Arc<dyn RpcAdapter>) -> Self {
        Self { rpc, frontend: None }
    }

    pub fn with_frontend(mut self, frontend: Frontend) -> Self {
        self.frontend = Some(Arc::new(frontend));
        self
    }

    pub fn frontend_enabled(&self) -> bool {
        self.frontend.is_some()
    }

    pub async fn dispatch(&self, req: Request) -> Response {
        if self.rpc.is_rpc_web_request(&req) {
            return self.rpc.serve(req).await;
        }

        match &self.frontend {
            Some(frontend) => frontend.serve(&req),
            None => {
                tracing::debug!(path = %req.uri().path(), "No handler for ordinary request");
                file_server::not_found()
            }
        }
    }

    /// Mount the dispatcher as the catch-all handler of a router.
    pub fn into_router(self) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(Arc::new(self))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("frontend", &self.frontend)
            .finish_non_exhaustive()
    }
}

async fn dispatch_handler(State(dispatcher): State<Arc<Dispatcher>>, req: Request) -> Response {
    dispatcher.dispatch(req).await
}
