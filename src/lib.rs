//! Hierarchical configuration resolution service.
//!
//! Resolves configuration parameters by walking an ordered hierarchy of
//! criteria levels (e.g. device, country, connection, version) and returning
//! the parameters of the deepest node reached.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────────────┐
//!                      │                 CONFIGURATION SERVICE                │
//!                      │                                                      │
//!   GET /tree?...      │  ┌─────────┐    ┌──────────┐    ┌────────────────┐   │
//!   ───────────────────┼─▶│  http   │───▶│  search  │───▶│ tree (ArcSwap) │   │
//!                      │  │ server  │    │ expander │    │  immutable     │   │
//!   GET /tree/a/b      │  └────┬────┘    │ resolver │    └───────▲────────┘   │
//!                      │       │         └──────────┘            │            │
//!                      │       ▼                                 │ reload     │
//!   200 / 304 / 4xx    │  ┌─────────┐                     ┌──────┴───────┐    │
//!   ◀──────────────────┼──│  cache  │                     │ config       │    │
//!                      │  │ETag/IMS │                     │ watcher      │    │
//!                      │  └─────────┘                     └──────────────┘    │
//!                      │                                                      │
//!                      │  lifecycle (startup/signals)   observability         │
//!                      └──────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod search;
pub mod tree;

pub use config::schema::ServiceConfig;
pub use error::{ResolveError, ResolveResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use tree::Configuration;
