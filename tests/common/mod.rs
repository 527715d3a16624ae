//! Shared fixtures for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue},
    response::Response,
};
use futures_util::future::BoxFuture;

use basecoat_gateway::frontend::{Asset, AssetBundle, Frontend, MemoryBundle};
use basecoat_gateway::rpc::RpcAdapter;

pub const INDEX_HTML: &str = "<!doctype html><div id=\"app\"></div>";
pub const APP_JS: &str = "console.log('basecoat');";
pub const FONT: &str = "wOF2";
pub const RPC_BODY: &[u8] = b"\x00\x00\x00\x00\x00";

/// RPC adapter that records calls and answers with a fixed body.
#[derive(Default)]
pub struct RecordingRpc {
    calls: AtomicUsize,
}

impl RecordingRpc {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RpcAdapter for RecordingRpc {
    fn serve(&self, req: Request) -> BoxFuture<'static, Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let content_type = req.headers().get(header::CONTENT_TYPE).cloned();
        Box::pin(async move {
            let mut response = Response::new(Body::from(RPC_BODY));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                content_type.unwrap_or_else(|| HeaderValue::from_static("application/grpc-web+proto")),
            );
            response
                .headers_mut()
                .insert("grpc-status", HeaderValue::from_static("0"));
            response
        })
    }
}

/// Bundle that counts lookups to prove whether the frontend was consulted.
pub struct CountingBundle {
    inner: MemoryBundle,
    lookups: AtomicUsize,
}

impl CountingBundle {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl AssetBundle for CountingBundle {
    fn get(&self, path: &str) -> Option<Asset> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.get(path)
    }
}

pub fn bundle() -> Arc<CountingBundle> {
    Arc::new(CountingBundle {
        inner: [
            ("index.html", INDEX_HTML),
            ("app.js", APP_JS),
            ("fonts/my font.woff2", FONT),
        ]
        .into_iter()
        .collect(),
        lookups: AtomicUsize::new(0),
    })
}

pub fn frontend(bundle: &Arc<CountingBundle>) -> Frontend {
    Frontend::new(bundle.clone(), "index.html").unwrap()
}

pub async fn body_of(response: Response) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap()
}
