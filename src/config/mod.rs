//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RedirectorConfig (validated, immutable)
//!     → RedirectRules handed to the classifier at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::EmbedConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::RedirectConfig;
pub use schema::RedirectorConfig;
pub use schema::TimeoutConfig;
pub use schema::UpstreamConfig;
