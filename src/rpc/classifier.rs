//! Traffic classification.
//!
//! Decides from headers alone whether a request is gRPC-Web. The body is
//! never read here, so RPC requests reach the adapter untouched.

use axum::http::{header, HeaderMap};

/// Prefix shared by every gRPC-Web content type, including the
/// `application/grpc-web-text` framing.
const GRPC_WEB_CONTENT_TYPE: &str = "application/grpc-web";

/// Header browsers' gRPC-Web clients send to declare support.
const X_GRPC_WEB: &str = "x-grpc-web";

/// Routing class of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficClass {
    /// gRPC-Web traffic for the RPC adapter.
    RpcWeb,
    /// Everything else.
    Ordinary,
}

/// Classify a request by its headers. Unknown requests are `Ordinary`.
pub fn classify(headers: &HeaderMap) -> TrafficClass {
    if has_grpc_web_content_type(headers) || declares_grpc_web(headers) {
        TrafficClass::RpcWeb
    } else {
        TrafficClass::Ordinary
    }
}

fn has_grpc_web_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim_start().get(..GRPC_WEB_CONTENT_TYPE.len()))
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(GRPC_WEB_CONTENT_TYPE))
}

/// `x-grpc-web` on the request itself, or listed in a CORS preflight.
fn declares_grpc_web(headers: &HeaderMap) -> bool {
    if headers.contains_key(X_GRPC_WEB) {
        return true;
    }
    headers
        .get_all(header::ACCESS_CONTROL_REQUEST_HEADERS)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|name| name.trim().eq_ignore_ascii_case(X_GRPC_WEB))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn grpc_web_content_types() {
        for ct in [
            "application/grpc-web",
            "application/grpc-web+proto",
            "application/grpc-web+json",
            "application/grpc-web-text",
            "application/grpc-web-text+proto",
            "Application/GRPC-Web+proto",
        ] {
            assert_eq!(classify(&with_content_type(ct)), TrafficClass::RpcWeb, "{ct}");
        }
    }

    #[test]
    fn ordinary_content_types() {
        for ct in [
            "text/html",
            "application/json",
            "application/grpc",
            "application/grpc+proto",
            "grpc-web",
        ] {
            assert_eq!(classify(&with_content_type(ct)), TrafficClass::Ordinary, "{ct}");
        }
    }

    #[test]
    fn missing_headers_are_ordinary() {
        assert_eq!(classify(&HeaderMap::new()), TrafficClass::Ordinary);
    }

    #[test]
    fn x_grpc_web_header_declares_support() {
        let mut headers = HeaderMap::new();
        headers.insert("x-grpc-web", HeaderValue::from_static("1"));
        assert_eq!(classify(&headers), TrafficClass::RpcWeb);
    }

    #[test]
    fn preflight_listing_x_grpc_web() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type, X-Grpc-Web, x-user-agent"),
        );
        assert_eq!(classify(&headers), TrafficClass::RpcWeb);

        headers.insert(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type, authorization"),
        );
        assert_eq!(classify(&headers), TrafficClass::Ordinary);
    }

    #[test]
    fn non_ascii_content_type_is_ordinary() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_bytes(b"application/\xffgrpc-web").unwrap(),
        );
        assert_eq!(classify(&headers), TrafficClass::Ordinary);
    }
}
