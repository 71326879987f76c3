//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the tree and health handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Apply reloaded trees to the shared state
//! - Bind and serve, plain or TLS, until shutdown

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{body::Body, http::Request, routing::get, Router};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::tree::Configuration;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub tree: Arc<ArcSwap<Configuration>>,
}

/// HTTP server for the configuration tree.
pub struct HttpServer {
    router: Router,
    tree: Arc<ArcSwap<Configuration>>,
    shutdown_grace: Duration,
}

impl HttpServer {
    /// Create a server answering from `tree`.
    pub fn new(config: &ServiceConfig, tree: Configuration) -> Self {
        let tree = Arc::new(ArcSwap::from_pointee(tree));
        let state = AppState { tree: tree.clone() };
        let router = build_router(state, Duration::from_secs(config.timeouts.request_secs));
        Self {
            router,
            tree,
            shutdown_grace: Duration::from_secs(config.timeouts.shutdown_grace_secs),
        }
    }

    /// Handle to the active tree.
    pub fn tree(&self) -> Arc<ArcSwap<Configuration>> {
        self.tree.clone()
    }

    /// The fully layered router, e.g. for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        tree_updates: mpsc::UnboundedReceiver<Configuration>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let updates = spawn_tree_updates(self.tree.clone(), tree_updates);
        let mut deadline = shutdown.resubscribe();
        let grace = self.shutdown_grace;

        let serve = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .into_future();

        tokio::select! {
            result = serve => result?,
            _ = async move {
                let _ = deadline.recv().await;
                tokio::time::sleep(grace).await;
            } => {
                tracing::warn!(grace_secs = grace.as_secs(), "Grace period elapsed, closing remaining connections");
            }
        }

        updates.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Serve TLS on `addr` until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        tree_updates: mpsc::UnboundedReceiver<Configuration>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let updates = spawn_tree_updates(self.tree.clone(), tree_updates);
        let handle = axum_server::Handle::new();
        let shutdown_handle = handle.clone();
        let grace = self.shutdown_grace;
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Shutdown signal received, draining connections");
            shutdown_handle.graceful_shutdown(Some(grace));
        });

        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        updates.abort();
        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// The request ID is set outermost so the trace span can record it.
#[allow(deprecated)]
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/tree", get(handlers::search_tree))
        .route("/tree/", get(handlers::get_root))
        .route("/tree/{*path}", get(handlers::get_node))
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                request_id = %request_id(req),
            )
        }))
        .layer(set_request_id_layer())
}

/// Swap in every tree received on `updates`.
pub fn spawn_tree_updates(
    tree: Arc<ArcSwap<Configuration>>,
    mut updates: mpsc::UnboundedReceiver<Configuration>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(next) = updates.recv().await {
            let nodes = next.node_count();
            let levels = next.levels().len();
            tree.store(Arc::new(next));
            metrics::record_reload("applied");
            metrics::record_tree_size(nodes);
            tracing::info!(nodes, levels, "Configuration tree reloaded");
        }
    })
}
