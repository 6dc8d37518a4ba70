//! Pass-through forwarding to the upstream.
//!
//! # Responsibilities
//! - Rewrite the request URI to the configured upstream
//! - Keep method, path, query, headers and body as received
//! - Stream the upstream response back unchanged
//!
//! # Design Decisions
//! - Injected as a trait object so the server can be tested without a network
//! - Hop-by-hop headers are connection-scoped and stripped
//! - Upstream speaks HTTP/1.1 regardless of the inbound protocol
//! - No retries: a failure is reported once as 502

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{
        header,
        uri::{Authority, PathAndQuery, Scheme},
        HeaderValue, Request, Uri, Version,
    },
    response::Response,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::{TimeoutConfig, UpstreamConfig};

/// Errors raised while forwarding to the upstream.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream authority {0:?}")]
    InvalidAuthority(String),

    #[error("could not build upstream URI: {0}")]
    InvalidUri(#[from] axum::http::uri::InvalidUriParts),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// Sends a pass-through request to wherever "the origin" is.
#[async_trait]
pub trait Forwarder: Send + Sync {
    async fn forward(&self, request: Request<Body>) -> Result<Response, ForwardError>;
}

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Forwards over a pooled hyper client to a fixed upstream authority.
#[derive(Clone)]
pub struct UpstreamForwarder {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl UpstreamForwarder {
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, ForwardError> {
        let authority = Authority::from_str(&upstream.address)
            .map_err(|_| ForwardError::InvalidAuthority(upstream.address.clone()))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self { client, authority })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Build the request sent upstream from the inbound one.
    fn upstream_request(&self, request: Request<Body>) -> Result<Request<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();

        // HTTP/2 requests carry the host in the URI, not in a header.
        if !parts.headers.contains_key(header::HOST) {
            if let Some(authority) = parts.uri.authority() {
                if let Ok(host) = HeaderValue::from_str(authority.as_str()) {
                    parts.headers.insert(header::HOST, host);
                }
            }
        }

        strip_hop_by_hop(&mut parts.headers);

        let mut uri_parts = parts.uri.into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        parts.uri = Uri::from_parts(uri_parts)?;
        parts.version = Version::HTTP_11;

        Ok(Request::from_parts(parts, body))
    }
}

#[async_trait]
impl Forwarder for UpstreamForwarder {
    async fn forward(&self, request: Request<Body>) -> Result<Response, ForwardError> {
        let request = self.upstream_request(request)?;
        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

fn strip_hop_by_hop(headers: &mut header::HeaderMap) {
    // Headers named in Connection are hop-by-hop too.
    let named: Vec<header::HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| header::HeaderName::from_str(name.trim()).ok())
        .collect();

    for name in named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forwarder() -> UpstreamForwarder {
        UpstreamForwarder::new(
            &UpstreamConfig {
                address: "127.0.0.1:3000".into(),
            },
            &TimeoutConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_uri_rewritten_to_upstream() {
        let req = Request::builder()
            .method("POST")
            .uri("/about?x=1")
            .header("Host", "edge.example.com")
            .header("User-Agent", "Googlebot/2.1")
            .body(Body::from("payload"))
            .unwrap();

        let out = forwarder().upstream_request(req).unwrap();
        assert_eq!(out.uri(), "http://127.0.0.1:3000/about?x=1");
        assert_eq!(out.method(), "POST");
        assert_eq!(out.headers()["host"], "edge.example.com");
        assert_eq!(out.headers()["user-agent"], "Googlebot/2.1");
        assert_eq!(out.version(), Version::HTTP_11);

        let body = axum::body::to_bytes(out.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"payload");
    }

    #[test]
    fn test_http2_authority_becomes_host() {
        let req = Request::builder()
            .uri("https://edge.example.com/chapters/1")
            .version(Version::HTTP_2)
            .body(Body::empty())
            .unwrap();

        let out = forwarder().upstream_request(req).unwrap();
        assert_eq!(out.headers()["host"], "edge.example.com");
        assert_eq!(out.uri(), "http://127.0.0.1:3000/chapters/1");
    }

    #[test]
    fn test_hop_by_hop_headers_stripped() {
        let req = Request::builder()
            .uri("/")
            .header("Connection", "keep-alive, x-hop")
            .header("Keep-Alive", "timeout=5")
            .header("X-Hop", "1")
            .header("Upgrade", "websocket")
            .header("Accept", "text/html")
            .body(Body::empty())
            .unwrap();

        let out = forwarder().upstream_request(req).unwrap();
        assert!(out.headers().get("connection").is_none());
        assert!(out.headers().get("keep-alive").is_none());
        assert!(out.headers().get("x-hop").is_none());
        assert!(out.headers().get("upgrade").is_none());
        assert_eq!(out.headers()["accept"], "text/html");
    }

    #[test]
    fn test_invalid_authority() {
        let err = UpstreamForwarder::new(
            &UpstreamConfig {
                address: "bad address".into(),
            },
            &TimeoutConfig::default(),
        )
        .err()
        .unwrap();
        assert!(matches!(err, ForwardError::InvalidAuthority(_)));
    }
}
