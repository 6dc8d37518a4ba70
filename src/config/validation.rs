//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate origin URL shape so `base + path` is well formed
//! - Validate prefixes, addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedirectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::uri::Authority;
use thiserror::Error;
use url::Url;

use crate::config::schema::RedirectorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("redirect.origin_base_url {url:?} is invalid: {reason}")]
    OriginBaseUrl { url: String, reason: String },

    #[error("redirect.prefixes[{index}] {prefix:?} must be non-empty and start with '/'")]
    Prefix { index: usize, prefix: String },

    #[error("upstream.address {0:?} is not a valid authority")]
    UpstreamAddress(String),

    #[error("{field} {value:?} is not a valid socket address")]
    BindAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.log_format {0:?} must be \"pretty\" or \"json\"")]
    LogFormat(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RedirectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(reason) = check_origin_base(&config.redirect.origin_base_url) {
        errors.push(ValidationError::OriginBaseUrl {
            url: config.redirect.origin_base_url.clone(),
            reason,
        });
    }

    for (index, prefix) in config.redirect.prefixes.iter().enumerate() {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::Prefix {
                index,
                prefix: prefix.clone(),
            });
        }
    }

    if Authority::from_str(&config.upstream.address).is_err() {
        errors.push(ValidationError::UpstreamAddress(config.upstream.address.clone()));
    }

    for (field, value) in [
        ("listener.bind_address", &config.listener.bind_address),
        ("embed.bind_address", &config.embed.bind_address),
    ] {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::BindAddress {
                field,
                value: value.clone(),
            });
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }
    if config.embed.fetch_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("embed.fetch_timeout_secs"));
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::LogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_origin_base(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("must not carry a query or fragment".to_string());
    }
    // Request paths always start with '/', so a trailing one would double up.
    if raw.ends_with('/') {
        return Err("must not end with '/'".to_string());
    }
    Ok(())
}
