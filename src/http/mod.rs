//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, InboundRequest view)
//!     → [routing::Redirector decides]
//!         Redirect    → response.rs (302 + Location)
//!         PassThrough → forward.rs (upstream over hyper)
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{ForwardError, Forwarder, UpstreamForwarder};
pub use request::{EdgeRequest, InboundRequest, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
