//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! [listener.tls] cert_path / key_path
//!     → tls.rs (load PEM chain and key)
//!     → RustlsConfig handed to HttpServer::run_tls
//! ```
//!
//! # Design Decisions
//! - TLS is optional; plain TCP is the default
//! - Missing files are reported before rustls sees them

pub mod tls;

pub use tls::load_tls_config;
