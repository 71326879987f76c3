//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! service file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!
//! tree definition (JSON):
//!     watcher.rs detects change
//!     → tree::loader builds a new Configuration
//!     → sent to the server, which swaps Arc<Configuration> atomically
//!     → failed loads keep the current tree
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ListenerConfig, ObservabilityConfig, ServiceConfig, TimeoutConfig, TlsConfig,
    TreeSourceConfig,
};
pub use validation::validate_config;
pub use watcher::{reload_tree, TreeWatcher, WatchHandle};
