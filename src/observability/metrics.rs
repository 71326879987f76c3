//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_requests_total` (counter): requests by endpoint, status
//! - `config_request_duration_seconds` (histogram): latency distribution
//! - `config_not_modified_total` (counter): 304 responses by endpoint
//! - `config_tree_reloads_total` (counter): reloads by outcome
//! - `config_tree_nodes` (gauge): node count of the active tree
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are bounded: endpoints and outcomes are fixed strings

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "config_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("config_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record a request answered with 304.
pub fn record_not_modified(endpoint: &'static str) {
    metrics::counter!("config_not_modified_total", "endpoint" => endpoint).increment(1);
}

/// Record a tree reload attempt.
pub fn record_reload(outcome: &'static str) {
    metrics::counter!("config_tree_reloads_total", "outcome" => outcome).increment(1);
}

/// Record the size of the active tree.
pub fn record_tree_size(nodes: usize) {
    metrics::gauge!("config_tree_nodes").set(nodes as f64);
}
