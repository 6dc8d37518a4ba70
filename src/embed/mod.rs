//! Link preview service for crawlers.
//!
//! Bots passed through by the edge land here. Chat apps and social sites
//! unfurl chapter links from the OpenGraph tags this service renders.
//!
//! # Data Flow
//! ```text
//! GET /chapters/{slug}
//!     → routing::AgentClass (human → 302 to origin)
//!     → client.rs (origin /chapters/{slug}.json)
//!     → chapter.rs (tags → description)
//!     → page.rs (HTML with og:* meta)
//! ```

pub mod chapter;
pub mod client;
pub mod page;
pub mod server;

pub use chapter::Chapter;
pub use client::{ChapterSource, EmbedError, OriginChapterSource};
pub use server::EmbedServer;
