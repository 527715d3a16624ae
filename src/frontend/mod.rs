//! Single-page application serving.
//!
//! # Data Flow
//! ```text
//! Ordinary request path
//!     → percent-decode (invalid UTF-8 → 404)
//!     → is_asset_path ("." in path or "/")
//!         yes → file_server.rs (bundle lookup, 404 on miss)
//!         no  → fallback document, 200 (history mode)
//! ```
//!
//! # Design Decisions
//! - Bundle and fallback are resolved once at startup and never change
//! - The "contains a dot" rule is kept as-is even though it treats routes
//!   like `/user/v1.2` as files

pub mod bundle;
pub mod file_server;
pub mod mime;

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use percent_encoding::percent_decode_str;
use thiserror::Error;

use crate::config::FrontendConfig;

pub use bundle::{Asset, AssetBundle, MemoryBundle};

/// Startup-fatal frontend problems.
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("Failed to load frontend assets from {dir:?}: {source}")]
    Load {
        dir: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Fallback document '{0}' is missing from the asset bundle")]
    MissingFallback(String),
}

/// Asset resolver with history-mode fallback.
#[derive(Clone)]
pub struct Frontend {
    bundle: Arc<dyn AssetBundle>,
    fallback: Bytes,
}

impl Frontend {
    /// Resolve the fallback document up front; a frontend cannot run without it.
    pub fn new(bundle: Arc<dyn AssetBundle>, fallback_document: &str) -> Result<Self, FrontendError> {
        let key = file_server::bundle_key(fallback_document);
        let fallback = bundle
            .get(&key)
            .ok_or_else(|| FrontendError::MissingFallback(fallback_document.to_string()))?
            .contents;
        Ok(Self { bundle, fallback })
    }

    /// Load the bundle from the configured directory.
    pub fn from_config(config: &FrontendConfig) -> Result<Self, FrontendError> {
        let bundle = MemoryBundle::from_dir(&config.assets_dir).map_err(|source| FrontendError::Load {
            dir: config.assets_dir.clone(),
            source,
        })?;
        Self::new(Arc::new(bundle), &config.fallback_document)
    }

    /// Answer an ordinary (non-RPC) request.
    pub fn serve(&self, req: &Request) -> Response {
        let raw = req.uri().path();
        let Ok(path) = percent_decode_str(raw).decode_utf8() else {
            tracing::debug!(path = %raw, "Path is not valid UTF-8 once decoded");
            return file_server::not_found();
        };

        if is_asset_path(&path) {
            file_server::serve_file(self.bundle.as_ref(), req.method(), &path, req.headers())
        } else {
            self.fallback_response()
        }
    }

    fn fallback_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.fallback.clone()));
        *response.status_mut() = StatusCode::OK;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        response
    }
}

impl std::fmt::Debug for Frontend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frontend")
            .field("fallback_len", &self.fallback.len())
            .finish_non_exhaustive()
    }
}

/// Paths that look like files (or the root) go to the file server.
pub fn is_asset_path(path: &str) -> bool {
    path.contains('.') || path == "/"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const INDEX: &str = "<html>spa</html>";

    /// Bundle that counts lookups so tests can see whether it was consulted.
    #[derive(Default)]
    struct CountingBundle {
        inner: MemoryBundle,
        lookups: AtomicUsize,
    }

    impl AssetBundle for CountingBundle {
        fn get(&self, path: &str) -> Option<Asset> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.get(path)
        }
    }

    fn counting() -> Arc<CountingBundle> {
        Arc::new(CountingBundle {
            inner: [
                ("index.html", INDEX),
                ("app.js", "app();"),
                ("my file.js", "spaced();"),
                ("ü.css", "body{}"),
            ]
            .into_iter()
            .collect(),
            lookups: AtomicUsize::new(0),
        })
    }

    fn get(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_of(response: Response) -> Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    #[test]
    fn asset_path_rule() {
        assert!(is_asset_path("/"));
        assert!(is_asset_path("/app.js"));
        assert!(is_asset_path("/user/v1.2"));
        assert!(!is_asset_path("/dashboard/settings"));
        assert!(!is_asset_path("/dashboard/"));
        assert!(!is_asset_path(""));
    }

    #[test]
    fn missing_fallback_is_fatal() {
        let bundle: MemoryBundle = [("app.js", "app();")].into_iter().collect();
        let err = Frontend::new(Arc::new(bundle), "index.html").unwrap_err();
        assert!(matches!(err, FrontendError::MissingFallback(name) if name == "index.html"));
    }

    #[test]
    fn missing_assets_dir_is_fatal() {
        let config = FrontendConfig {
            enable: true,
            assets_dir: "/nonexistent/public".into(),
            fallback_document: "index.html".into(),
        };
        assert!(matches!(
            Frontend::from_config(&config),
            Err(FrontendError::Load { .. })
        ));
    }

    #[tokio::test]
    async fn file_like_paths_hit_the_bundle() {
        let bundle = counting();
        let frontend = Frontend::new(bundle.clone(), "index.html").unwrap();
        let before = bundle.lookups.load(Ordering::SeqCst);

        let response = frontend.serve(&get("/app.js"));
        assert_eq!(bundle.lookups.load(Ordering::SeqCst), before + 1);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&body_of(response).await[..], b"app();");
    }

    #[tokio::test]
    async fn missing_file_like_path_is_404_not_fallback() {
        let frontend = Frontend::new(counting(), "index.html").unwrap();
        let response = frontend.serve(&get("/user/v1.2"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn application_routes_get_fallback_without_lookup() {
        let bundle = counting();
        let frontend = Frontend::new(bundle.clone(), "index.html").unwrap();
        let before = bundle.lookups.load(Ordering::SeqCst);

        for uri in ["/dashboard/settings", "/formulas?page=2", "/app", "/index"] {
            let response = frontend.serve(&get(uri));
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                "text/html; charset=utf-8"
            );
            assert_eq!(&body_of(response).await[..], INDEX.as_bytes(), "{uri}");
        }
        assert_eq!(bundle.lookups.load(Ordering::SeqCst), before);
    }

    #[tokio::test]
    async fn percent_encoded_paths_are_decoded() {
        let frontend = Frontend::new(counting(), "index.html").unwrap();

        let response = frontend.serve(&get("/my%20file.js"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&body_of(response).await[..], b"spaced();");

        let response = frontend.serve(&get("/%C3%BC.css"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&body_of(response).await[..], b"body{}");

        let response = frontend.serve(&get("/app%2Ejs"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(&body_of(response).await[..], b"app();");
    }

    #[tokio::test]
    async fn undecodable_path_is_404() {
        let frontend = Frontend::new(counting(), "index.html").unwrap();
        let response = frontend.serve(&get("/dashboard%FF"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn query_string_does_not_affect_routing() {
        let frontend = Frontend::new(counting(), "index.html").unwrap();
        let response = frontend.serve(&get("/app.js?v=3"));
        assert_eq!(&body_of(response).await[..], b"app();");
    }
}
