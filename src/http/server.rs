//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the edge handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Run the classifier per request
//! - Answer redirects directly, forward everything else upstream

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::RedirectorConfig;
use crate::http::forward::{ForwardError, Forwarder, UpstreamForwarder};
use crate::http::request::{request_id_of, UuidRequestId};
use crate::http::response::{bad_gateway, internal_error};
use crate::lifecycle::shutdown::drained;
use crate::routing::{Outcome, RedirectRules, Redirector};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub redirector: Arc<Redirector>,
    pub forwarder: Arc<dyn Forwarder>,
}

/// HTTP server hosting the redirector.
pub struct HttpServer {
    router: Router,
    config: RedirectorConfig,
}

impl HttpServer {
    /// Create a new HTTP server forwarding pass-through traffic to the configured upstream.
    pub fn new(config: RedirectorConfig) -> Result<Self, ForwardError> {
        let forwarder = UpstreamForwarder::new(&config.upstream, &config.timeouts)?;
        Ok(Self::with_forwarder(config, Arc::new(forwarder)))
    }

    /// Create a server with an explicit pass-through collaborator.
    pub fn with_forwarder(config: RedirectorConfig, forwarder: Arc<dyn Forwarder>) -> Self {
        let rules = RedirectRules::from_config(&config.redirect);
        let state = AppState {
            redirector: Arc::new(Redirector::new(rules)),
            forwarder,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RedirectorConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(edge_handler))
            .route("/", any(edge_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.config.redirect.origin_base_url,
            prefixes = ?self.config.redirect.prefixes,
            upstream = %self.config.upstream.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(drained(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RedirectorConfig {
        &self.config
    }
}

/// Classifies the request, then redirects or forwards it.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request_id_of(&request).to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match state.redirector.handle(&request) {
        Ok(Outcome::Redirect(redirect)) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                location = %redirect.location,
                "Redirecting to origin"
            );
            redirect.into_response()
        }
        Ok(Outcome::PassThrough) => {
            tracing::debug!(request_id = %request_id, method = %method, path = %path, "Passing through");
            match state.forwarder.forward(request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(request_id = %request_id, path = %path, error = %e, "Upstream error");
                    bad_gateway()
                }
            }
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to classify request");
            internal_error()
        }
    }
}
