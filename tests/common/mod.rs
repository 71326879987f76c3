//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use config_service::config::ServiceConfig;
use config_service::http::HttpServer;
use config_service::lifecycle::Shutdown;
use config_service::tree::Configuration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load a fixture tree.
pub fn load_fixture(name: &str) -> Configuration {
    Configuration::from_path(&fixture(name)).unwrap()
}

/// Fully layered router serving a fixture tree.
pub fn app(name: &str) -> Router {
    HttpServer::new(&ServiceConfig::default(), load_fixture(name)).router()
}

/// A response read to completion.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Send a GET through `router` without a socket.
pub async fn get(router: &Router, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
    let mut request = Request::builder().uri(uri);
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    send(router, request.body(Body::empty()).unwrap()).await
}

/// Send a prebuilt request through `router`.
pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    TestResponse {
        status,
        headers,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// A server running on an ephemeral local port.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<Configuration>,
    pub tree: Arc<ArcSwap<Configuration>>,
    pub shutdown: Shutdown,
}

impl RunningServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a real server answering from `tree`.
pub async fn start_server(tree: Configuration) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (updates, update_rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let server = HttpServer::new(&ServiceConfig::default(), tree);
    let tree = server.tree();
    tokio::spawn(async move {
        server.run(listener, update_rx, server_shutdown).await.unwrap();
    });

    RunningServer {
        addr,
        updates,
        tree,
        shutdown,
    }
}
