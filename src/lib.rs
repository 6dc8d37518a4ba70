//! Edge redirector library.
//!
//! Sends human visitors of selected paths straight to the origin site with a
//! `302`, and lets crawlers (and everything else) through to the upstream.

pub mod config;
pub mod embed;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::RedirectorConfig;
pub use embed::EmbedServer;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Outcome, Redirector};
