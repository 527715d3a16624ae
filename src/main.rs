//! Basecoat gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request (TLS)
//!     ───────────────────▶ axum-server ──▶ logger scope ──▶ [debug: request log]
//!                                                                │
//!                                                                ▼
//!                                     cross-origin headers ──▶ timeouts
//!                                                                │
//!                                                                ▼
//!                                                          Dispatcher
//!                                                     ┌──────────┴──────────┐
//!                                                gRPC-Web               ordinary
//!                                                     │                     │
//!                                                     ▼                     ▼
//!                                               RpcAdapter      Frontend (history mode)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use basecoat_gateway::config::{load_config, ServiceConfig};
use basecoat_gateway::frontend::Frontend;
use basecoat_gateway::http::GatewayServer;
use basecoat_gateway::observability::Logger;
use basecoat_gateway::rpc::UnimplementedRpc;

#[derive(Parser)]
#[command(name = "basecoat-gateway")]
#[command(about = "Serves gRPC-Web and the Basecoat frontend over TLS", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force debug logging and per-request access logs.
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                Logger::new(&ServiceConfig::default()).in_scope(|| {
                    tracing::error!(path = ?path, error = %e, "Failed to load configuration")
                });
                return ExitCode::FAILURE;
            }
        },
        None => ServiceConfig::default(),
    };
    config.debug |= cli.debug;

    let logger = Logger::new(&config);
    logger.in_scope(|| {
        tracing::info!(
            bind_address = %config.listener.bind_address,
            frontend = config.frontend.enable,
            debug = config.debug,
            "basecoat-gateway v0.1.0 starting"
        )
    });

    let mut server = GatewayServer::new(config.clone(), Arc::new(UnimplementedRpc), logger.clone());

    if config.frontend.enable {
        match Frontend::from_config(&config.frontend) {
            Ok(frontend) => server = server.with_frontend(frontend),
            Err(e) => {
                logger.in_scope(|| tracing::error!(error = %e, "Failed to load frontend"));
                return ExitCode::FAILURE;
            }
        }
    }

    match server.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logger.in_scope(|| tracing::error!(error = %e, "Fatal error, shutting down"));
            ExitCode::FAILURE
        }
    }
}
