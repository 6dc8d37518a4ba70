//! Request handling.
//!
//! # Responsibilities
//! - Expose the parts of a request the classifier reads (URL, headers)
//! - Generate unique request IDs (UUID v4)
//!
//! # Design Decisions
//! - Header lookup is case-insensitive by contract, whatever backs it
//! - Origin-form URIs are made absolute from the Host header so the URL
//!   parser always sees a full URL; an invalid Host becomes `localhost`
//! - Request ID added as early as possible for tracing

use std::borrow::Cow;
use std::str::FromStr;

use axum::http::{header, uri::Authority, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Read-only view of an inbound request.
pub trait InboundRequest {
    /// Absolute URL of the request.
    fn url(&self) -> Cow<'_, str>;

    /// Header value by case-insensitive name.
    fn header(&self, name: &str) -> Option<Cow<'_, str>>;
}

impl<B> InboundRequest for Request<B> {
    fn url(&self) -> Cow<'_, str> {
        let uri = self.uri();
        if uri.scheme().is_some() && uri.authority().is_some() {
            return Cow::Owned(uri.to_string());
        }

        // Only a well-formed authority may precede the path; anything else
        // (a '/', '?' or '#' smuggled into Host) would shift pathname and search.
        let host = self
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .filter(|h| Authority::from_str(h).is_ok())
            .unwrap_or("localhost");
        let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        Cow::Owned(format!("http://{host}{path_and_query}"))
    }

    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        // HeaderMap lookups are already case-insensitive.
        self.headers()
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
    }
}

/// Owned request description, used off the HTTP path (CLI, tests).
#[derive(Debug, Clone, Default)]
pub struct EdgeRequest {
    url: String,
    headers: Vec<(String, String)>,
}

impl EdgeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

impl InboundRequest for EdgeRequest {
    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.url)
    }

    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| Cow::Borrowed(v.as_str()))
    }
}

/// Produces `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Request ID of a request that already went through the request ID layer.
pub fn request_id_of<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_form_uses_host_header() {
        let req = Request::builder()
            .uri("/chapters/42?page=3")
            .header("Host", "edge.example.com")
            .body(())
            .unwrap();
        assert_eq!(req.url(), "http://edge.example.com/chapters/42?page=3");
    }

    #[test]
    fn test_absolute_form_kept() {
        let req = Request::builder()
            .uri("https://edge.example.com/images/a.png")
            .body(())
            .unwrap();
        assert_eq!(req.url(), "https://edge.example.com/images/a.png");
    }

    #[test]
    fn test_missing_host_falls_back() {
        let req = Request::builder().uri("/about").body(()).unwrap();
        assert_eq!(req.url(), "http://localhost/about");
    }

    #[test]
    fn test_invalid_host_cannot_reach_path() {
        for host in [
            "edge.example.com/chapters",
            "edge.example.com?",
            "edge.example.com#",
            "bad host",
        ] {
            let req = Request::builder()
                .uri("/about?x=1")
                .header("Host", host)
                .body(())
                .unwrap();
            assert_eq!(req.url(), "http://localhost/about?x=1", "{host}");
        }
    }

    #[test]
    fn test_host_with_port_kept() {
        let req = Request::builder()
            .uri("/about")
            .header("Host", "127.0.0.1:8080")
            .body(())
            .unwrap();
        assert_eq!(req.url(), "http://127.0.0.1:8080/about");
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = Request::builder()
            .uri("/")
            .header("USER-AGENT", "Mozilla/5.0")
            .body(())
            .unwrap();
        assert_eq!(req.header("user-agent").as_deref(), Some("Mozilla/5.0"));

        let edge = EdgeRequest::new("https://a.example/").with_header("User-Agent", "Googlebot");
        assert_eq!(edge.header("user-agent").as_deref(), Some("Googlebot"));
        assert_eq!(edge.header("USER-AGENT").as_deref(), Some("Googlebot"));
        assert!(edge.header("accept").is_none());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let req = Request::builder().uri("/").body(()).unwrap();
        let mut maker = UuidRequestId;
        let a = maker.make_request_id(&req).unwrap();
        let b = maker.make_request_id(&req).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
