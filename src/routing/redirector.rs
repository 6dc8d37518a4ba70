//! Request classification and redirect decision.
//!
//! # Responsibilities
//! - Classify the agent (bot or human)
//! - For humans, match the path against the prefix set
//! - Produce `Redirect` (302 to origin + path + query) or `PassThrough`
//!
//! # Design Decisions
//! - Pure: reads the request, never mutates it, holds no mutable state
//! - Bots skip URL parsing entirely
//! - Rules are an explicit immutable value given at construction

use axum::http::StatusCode;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use crate::config::RedirectConfig;
use crate::http::request::InboundRequest;
use crate::routing::agent::{AgentClass, USER_AGENT};
use crate::routing::matcher::PrefixSet;

/// Errors raised while classifying a request.
#[derive(Debug, Error)]
pub enum RedirectError {
    /// The request URL could not be parsed into components.
    #[error("malformed request URL {url:?}: {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Static inputs to the redirect decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRules {
    origin_base: String,
    prefixes: PrefixSet,
}

impl RedirectRules {
    pub fn new(origin_base: impl Into<String>, prefixes: PrefixSet) -> Self {
        Self {
            origin_base: origin_base.into(),
            prefixes,
        }
    }

    pub fn from_config(config: &RedirectConfig) -> Self {
        Self::new(
            config.origin_base_url.clone(),
            PrefixSet::new(config.prefixes.iter().cloned()),
        )
    }

    pub fn origin_base(&self) -> &str {
        &self.origin_base
    }

    pub fn prefixes(&self) -> &PrefixSet {
        &self.prefixes
    }
}

/// Instruction for the hosting server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Redirect(Redirect),
    /// Forward the original request unmodified.
    PassThrough,
}

impl Outcome {
    /// Machine-readable summary, as printed by `check`.
    pub fn report(&self) -> Value {
        match self {
            Outcome::Redirect(redirect) => json!({
                "outcome": "redirect",
                "location": redirect.location,
                "status": redirect.status.as_u16(),
            }),
            Outcome::PassThrough => json!({ "outcome": "pass_through" }),
        }
    }
}

/// A temporary redirect to the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub location: String,
    pub status: StatusCode,
}

impl Redirect {
    fn found(location: String) -> Self {
        Self {
            location,
            status: StatusCode::FOUND,
        }
    }
}

/// The request classifier and redirector.
#[derive(Debug, Clone)]
pub struct Redirector {
    rules: RedirectRules,
}

impl Redirector {
    pub fn new(rules: RedirectRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RedirectRules {
        &self.rules
    }

    /// Decide what to do with `request`.
    pub fn handle<R>(&self, request: &R) -> Result<Outcome, RedirectError>
    where
        R: InboundRequest + ?Sized,
    {
        let agent = request.header(USER_AGENT);
        if AgentClass::from_user_agent(agent.as_deref()).is_automated() {
            return Ok(Outcome::PassThrough);
        }

        let raw = request.url();
        let url = Url::parse(&raw).map_err(|source| RedirectError::MalformedUrl {
            url: raw.clone().into_owned(),
            source,
        })?;

        let pathname = url.path();
        if self.rules.prefixes.first_match(pathname).is_none() {
            return Ok(Outcome::PassThrough);
        }

        let search = match url.query() {
            Some(query) if !query.is_empty() => format!("?{query}"),
            _ => String::new(),
        };
        let location = format!("{}{}{}", self.rules.origin_base, pathname, search);
        Ok(Outcome::Redirect(Redirect::found(location)))
    }
}
