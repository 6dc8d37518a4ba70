//! Routing subsystem: the per-request redirect decision.
//!
//! # Data Flow
//! ```text
//! Incoming Request (url, headers)
//!     → agent.rs (User-Agent → Automated | Human)
//!     → matcher.rs (humans only: first matching path prefix)
//!     → redirector.rs (Redirect to origin | PassThrough)
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same outcome
//! - First match wins (configuration order)

pub mod agent;
pub mod matcher;
pub mod redirector;

pub use agent::AgentClass;
pub use matcher::{PathPrefixMatcher, PrefixSet};
pub use redirector::{Outcome, Redirect, RedirectError, RedirectRules, Redirector};
