//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize logging from the validated configuration
//! - Load the initial tree (fatal on error)
//! - Start background tasks (metrics, watcher, SIGHUP reload)
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::config::{ServiceConfig, TreeWatcher};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::load_tls_config;
use crate::observability::{logging, metrics};
use crate::tree::{Configuration, TreeError};

/// Fatal errors before or while serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load tree: {0}")]
    Tree(#[from] TreeError),

    #[error("invalid address: {0}")]
    Address(#[from] AddrParseError),

    #[error("failed to watch tree definition: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Run the service until a shutdown signal arrives.
pub async fn run(config: ServiceConfig) -> Result<(), StartupError> {
    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "config-service starting");

    let tree_path = PathBuf::from(&config.tree.path);
    let tree = Configuration::from_path(&tree_path)?;
    tracing::info!(
        path = ?tree_path,
        files = tree.sources().len(),
        nodes = tree.node_count(),
        levels = ?tree.levels(),
        "Configuration tree loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?);
    }
    metrics::record_tree_size(tree.node_count());

    let (update_tx, update_rx) = mpsc::unbounded_channel();
    // Dropping the watcher stops it, so it lives until the server returns.
    let _watcher = if config.tree.watch {
        Some(
            TreeWatcher::with_sender(&tree_path, update_tx.clone())
                .with_sources(tree.sources())
                .run()?,
        )
    } else {
        None
    };
    let _hangup = signals::spawn_reload_on_hangup(tree_path, update_tx);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let server = HttpServer::new(&config, tree);
    match &config.listener.tls {
        Some(tls) => {
            let addr: SocketAddr = config.listener.bind_address.parse()?;
            let rustls = load_tls_config(tls).await?;
            server.run_tls(addr, rustls, update_rx, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(
                address = %listener.local_addr()?,
                request_timeout_secs = config.timeouts.request_secs,
                "Listening for connections"
            );
            server.run(listener, update_rx, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
