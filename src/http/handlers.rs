//! Request handlers for the tree endpoints.
//!
//! Every handler takes one snapshot of the active tree and answers from it,
//! so a reload in the middle of a request never mixes two trees.

use std::time::Instant;

use axum::{
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ResolveError;
use crate::http::request::conditional_headers;
use crate::http::response::{conditional_response, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::search::{self, expand, find_node, resolve_all, LevelQuery};
use crate::tree::{Configuration, NodeView};

/// `GET /tree?level=value&...`
///
/// Without a query this is a lookup of the root node.
pub async fn search_tree(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let tree = state.tree.load_full();
    let raw = query.unwrap_or_default();

    let result = LevelQuery::parse(&raw).and_then(|levels| {
        if levels.is_empty() {
            Ok(None)
        } else {
            expand(tree.levels(), &levels).map(Some)
        }
    });

    let response = match result {
        Ok(None) => node_response(&tree, "", &headers),
        Ok(Some(searches)) => {
            tracing::info!(query = %raw, searches = searches.len(), "Searching tree");
            resolve_all(&tree, &searches)
                .map_err(ApiError::from)
                .and_then(|results| {
                    let last_modified = search::resolver::last_modified(&results);
                    let cond = conditional_headers(&headers);
                    match results.as_slice() {
                        [single] => conditional_response("search", single, last_modified, &cond),
                        _ => conditional_response("search", &results, last_modified, &cond),
                    }
                })
        }
        Err(e) => Err(ApiError::from(e)),
    };

    finish("search", response, start)
}

/// `GET /tree/` addresses the root.
pub async fn get_root(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    lookup(state, String::new(), query, headers).await
}

/// `GET /tree/{*path}`
pub async fn get_node(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    lookup(state, path, query, headers).await
}

async fn lookup(
    state: AppState,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let tree = state.tree.load_full();

    let response = if query.is_some_and(|q| !q.is_empty()) {
        Err(ApiError::from(ResolveError::Conflict))
    } else {
        tracing::info!(path = %path, "Looking up node");
        node_response(&tree, &path, &headers)
    };

    finish("node", response, start)
}

fn node_response(
    tree: &Configuration,
    path: &str,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let node = find_node(tree, path)?;
    let levels: &[String] = if search::path::segments(path).next().is_none() {
        tree.levels()
    } else {
        &[]
    };
    let view = NodeView::new(node, levels);
    conditional_response(
        "node",
        &view,
        node.modified_up_to_root(),
        &conditional_headers(headers),
    )
}

fn finish(endpoint: &'static str, response: Result<Response, ApiError>, start: Instant) -> Response {
    let response = response.unwrap_or_else(IntoResponse::into_response);
    metrics::record_request(endpoint, response.status().as_u16(), start);
    tracing::debug!(
        endpoint,
        status = %response.status(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Request finished"
    );
    response
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let tree = state.tree.load();
    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "nodes": tree.node_count(),
        "levels": tree.levels(),
    }))
}
