//! Stand-in adapter for deployments without an RPC server attached.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use futures_util::future::BoxFuture;

use crate::rpc::RpcAdapter;

/// gRPC status code UNIMPLEMENTED.
const GRPC_STATUS_UNIMPLEMENTED: &str = "12";

/// Answers every gRPC-Web call with a trailers-only UNIMPLEMENTED status.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedRpc;

impl RpcAdapter for UnimplementedRpc {
    fn serve(&self, req: Request) -> BoxFuture<'static, Response> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .filter(|v| v.as_bytes().starts_with(b"application/grpc-web"))
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static("application/grpc-web+proto"));

        tracing::debug!(method = %req.uri().path(), "No RPC server attached");

        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::OK;
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, content_type);
        headers.insert("grpc-status", HeaderValue::from_static(GRPC_STATUS_UNIMPLEMENTED));
        headers.insert(
            "grpc-message",
            HeaderValue::from_static("RPC server not attached"),
        );
        Box::pin(async move { response })
    }
}
