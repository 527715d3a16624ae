//! Static file responses backed by an [`AssetBundle`].
//!
//! # Responsibilities
//! - Normalize the URL path into a bundle key
//! - Serve directory paths through their `index.html`
//! - Conditional `If-None-Match` handling against the bundle's `ETag`s
//! - Plain-text 404 on a miss

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::frontend::bundle::{Asset, AssetBundle};
use crate::frontend::mime::content_type_for;

const INDEX_DOCUMENT: &str = "index.html";

/// Map a URL path to a bundle key, resolving `.`, `..` and empty segments.
pub fn bundle_key(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    let is_directory = segments.is_empty() || path.ends_with('/');
    if is_directory {
        segments.push(INDEX_DOCUMENT);
    }
    segments.join("/")
}

/// Serve `path` from the bundle.
pub fn serve_file(
    bundle: &dyn AssetBundle,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
) -> Response {
    let key = bundle_key(path);
    match bundle.get(&key) {
        Some(asset) => {
            let if_none_match = headers
                .get(header::IF_NONE_MATCH)
                .and_then(|v| v.to_str().ok());
            build_file_response(&key, asset, if_none_match, method == Method::HEAD)
        }
        None => {
            tracing::debug!(path = %path, key = %key, "Asset not found");
            not_found()
        }
    }
}

/// Default 404 for anything the gateway cannot route.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found\n").into_response()
}

fn build_file_response(
    key: &str,
    asset: Asset,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response {
    let Asset { contents, etag } = asset;

    let mut response = if check_etag_match(if_none_match, &etag) {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NOT_MODIFIED;
        response
    } else {
        let length = contents.len();
        let mut response = if is_head {
            Response::new(Body::empty())
        } else {
            Response::new(Body::from(contents))
        };
        response
            .headers_mut()
            .insert(header::CONTENT_LENGTH, HeaderValue::from(length));
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type_for(key)),
        );
        response
    };

    if let Ok(value) = HeaderValue::from_str(&etag) {
        response.headers_mut().insert(header::ETAG, value);
    }
    response
}

/// True when `If-None-Match` lists `etag` or `*`.
fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client| {
        client
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}
