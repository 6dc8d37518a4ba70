//! Response construction.
//!
//! # Responsibilities
//! - Turn a redirect decision into a `302` with a `Location` header
//! - Map classification and upstream errors to status codes
//!
//! # Design Decisions
//! - Redirects carry no body
//! - Malformed request URLs result in 500, upstream failures in 502

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::routing::Redirect;

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        match HeaderValue::try_from(self.location.as_str()) {
            Ok(location) => Response::builder()
                .status(self.status)
                .header(header::LOCATION, location)
                .body(Body::empty())
                .unwrap_or_else(|_| internal_error()),
            Err(e) => {
                tracing::error!(location = %self.location, error = %e, "Redirect location is not a valid header value");
                internal_error()
            }
        }
    }
}

/// Generic failure for an invocation that could not be classified.
pub fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// Upstream could not be reached or answered with garbage.
pub fn bad_gateway() -> Response {
    (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
}
