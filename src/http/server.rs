//! Service lifecycle.
//!
//! # Responsibilities
//! - Build the dispatcher and wrap it in headers, timeouts and logging
//! - Load TLS material and bind the listener
//! - Serve until the process dies or the transport fails
//!
//! # Design Decisions
//! - STARTING → SERVING → TERMINATED; no drain, no restart
//! - Fail fast: any startup error is returned before a connection is accepted
//! - Logging goes to the injected `Logger`, never a global subscriber
//! - Read timeout bounds header reads and request bodies; write timeout
//!   answers 408 for slow handlers and aborts response bodies mid-stream

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use hyper_util::{
    rt::{TokioExecutor, TokioTimer},
    server::conn::auto,
};
use thiserror::Error;
use tower_http::{
    timeout::{RequestBodyTimeoutLayer, ResponseBodyTimeoutLayer, TimeoutLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{instrument::WithSubscriber, Level};

use crate::config::{ServiceConfig, TimeoutConfig};
use crate::frontend::Frontend;
use crate::http::dispatcher::Dispatcher;
use crate::http::headers::with_default_headers;
use crate::net::tls::{load_tls_config, TlsError};
use crate::observability::Logger;
use crate::rpc::RpcAdapter;

/// Terminal failure of the HTTP service.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Invalid listen address '{0}'")]
    Address(String),

    #[error(transparent)]
    Tls(#[from] TlsError),

    #[error("HTTP service failed: {0}")]
    Transport(#[source] std::io::Error),
}

/// TLS HTTP server combining the RPC adapter and the frontend.
pub struct GatewayServer {
    config: Arc<ServiceConfig>,
    rpc: Arc<dyn RpcAdapter>,
    frontend: Option<Frontend>,
    logger: Logger,
}

impl GatewayServer {
    pub fn new(config: ServiceConfig, rpc: Arc<dyn RpcAdapter>, logger: Logger) -> Self {
        Self {
            config: Arc::new(config),
            rpc,
            frontend: None,
            logger,
        }
    }

    /// Attach the frontend. It is only mounted when `frontend.enable` is set.
    pub fn with_frontend(mut self, frontend: Frontend) -> Self {
        self.frontend = Some(frontend);
        self
    }

    /// The fully layered service, without the TLS listener.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let mut dispatcher = Dispatcher::new(Arc::clone(&self.rpc));
        if self.config.frontend.enable {
            match &self.frontend {
                Some(frontend) => {
                    dispatcher = dispatcher.with_frontend(frontend.clone());
                    self.logger.in_scope(|| {
                        tracing::info!(
                            assets_dir = ?self.config.frontend.assets_dir,
                            fallback = %self.config.frontend.fallback_document,
                            "basecoat frontend enabled"
                        )
                    });
                }
                None => self.logger.in_scope(|| {
                    tracing::warn!("Frontend enabled in configuration but no assets attached")
                }),
            }
        }

        let timeouts = &self.config.timeouts;
        let router = dispatcher
            .into_router()
            .layer(TimeoutLayer::new(timeouts.write()))
            .layer(ResponseBodyTimeoutLayer::new(timeouts.write()))
            .layer(RequestBodyTimeoutLayer::new(timeouts.read()));
        let router = with_default_headers(router);

        let router = if self.config.debug {
            router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
        } else {
            router
        };

        router.layer(middleware::from_fn_with_state(
            self.logger.clone(),
            scope_to_logger,
        ))
    }

    /// Serve forever over TLS. Returns only on a fatal error.
    pub async fn run(self) -> Result<(), ServeError> {
        let dispatch = self.logger.dispatch().clone();
        self.serve().with_subscriber(dispatch).await
    }

    async fn serve(self) -> Result<(), ServeError> {
        let listener = &self.config.listener;
        let addr: SocketAddr = listener
            .bind_address
            .parse()
            .map_err(|_| ServeError::Address(listener.bind_address.clone()))?;

        let tls = load_tls_config(&listener.tls.cert_path, &listener.tls.key_path).await?;
        let app = self.router();

        tracing::info!(
            url = %addr,
            read_timeout_secs = self.config.timeouts.read_secs,
            write_timeout_secs = self.config.timeouts.write_secs,
            "starting basecoat http service"
        );

        let mut server = axum_server::bind_rustls(addr, tls);
        configure_connections(server.http_builder(), &self.config.timeouts);

        server
            .serve(app.into_make_service())
            .await
            .map_err(ServeError::Transport)?;

        tracing::warn!("HTTP service stopped");
        Ok(())
    }
}

/// Per-connection deadlines enforced by hyper itself.
///
/// HTTP/1 connections are closed when request headers (including the next
/// request on a kept-alive connection) take longer than the read timeout.
/// HTTP/2 connections are closed when a keep-alive ping goes unanswered.
fn configure_connections(builder: &mut auto::Builder<TokioExecutor>, timeouts: &TimeoutConfig) {
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.read())
        .keep_alive(true);
    builder
        .http2()
        .timer(TokioTimer::new())
        .keep_alive_interval(timeouts.read())
        .keep_alive_timeout(timeouts.read());
}

/// Run each request with the gateway's logger as the current subscriber.
async fn scope_to_logger(State(logger): State<Logger>, req: Request, next: Next) -> Response {
    next.run(req).with_subscriber(logger.dispatch().clone()).await
}
