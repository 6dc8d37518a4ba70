//! Embed service HTTP surface.
//!
//! # Responsibilities
//! - `GET /chapters/{slug}`: humans get a 302 to the chapter on the origin,
//!   bots get an OpenGraph preview page
//! - Map metadata fetch failures to 502

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RedirectorConfig;
use crate::embed::client::{ChapterSource, EmbedError, OriginChapterSource};
use crate::embed::page;
use crate::http::request::UuidRequestId;
use crate::http::response::bad_gateway;
use crate::lifecycle::shutdown::drained;
use crate::routing::{AgentClass, Redirect};

#[derive(Clone)]
pub struct EmbedState {
    pub origin_base: Arc<str>,
    pub source: Arc<dyn ChapterSource>,
}

/// The bot-facing preview service.
pub struct EmbedServer {
    router: Router,
    config: RedirectorConfig,
}

impl EmbedServer {
    pub fn new(config: RedirectorConfig) -> Result<Self, EmbedError> {
        let source = OriginChapterSource::new(
            config.redirect.origin_base_url.clone(),
            Duration::from_secs(config.embed.fetch_timeout_secs),
        )?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    pub fn with_source(config: RedirectorConfig, source: Arc<dyn ChapterSource>) -> Self {
        let state = EmbedState {
            origin_base: Arc::from(config.redirect.origin_base_url.as_str()),
            source,
        };
        let router = Router::new()
            .route("/chapters/{slug}", get(chapter_handler))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId));
        Self { router, config }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %listener.local_addr()?,
            origin = %self.config.redirect.origin_base_url,
            "Embed server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(drained(shutdown))
            .await?;

        tracing::info!("Embed server stopped");
        Ok(())
    }
}

async fn chapter_handler(
    State(state): State<EmbedState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Response {
    let location = format!("{}/chapters/{}", state.origin_base, slug);

    let agent = headers
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    if !AgentClass::from_user_agent(agent.as_deref()).is_automated() {
        return Redirect {
            location,
            status: StatusCode::FOUND,
        }
        .into_response();
    }

    match state.source.chapter(&slug).await {
        Ok(chapter) => Html(page::render(&chapter, &state.origin_base, &location)).into_response(),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "Failed to load chapter metadata");
            bad_gateway()
        }
    }
}
