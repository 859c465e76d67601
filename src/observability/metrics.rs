//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_transactions_total` (counter): completed relays by status code
//! - `proxy_error_responses_total` (counter): error pages served
//! - `proxy_active_connections` (gauge): current connection count
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations behind the metrics macros)
//! - Status code only as a label, never the full status line (cardinality)
//! - Exposition via Prometheus scrape endpoint, enabled by config

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and scrape endpoint.
///
/// Must be called from within a tokio runtime. Failure to install is logged
/// and otherwise ignored: the proxy runs fine without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed (non-error) transaction.
pub fn record_transaction(status_line: &str) {
    let code = status_line.split(' ').next().unwrap_or("unknown").to_string();
    metrics::counter!("proxy_transactions_total", "status" => code).increment(1);
}

/// Record an error response served to a client.
pub fn record_error_response() {
    metrics::counter!("proxy_error_responses_total").increment(1);
}

/// Record a connection being opened.
pub fn connection_opened() {
    metrics::gauge!("proxy_active_connections").increment(1.0);
}

/// Record a connection being closed.
pub fn connection_closed() {
    metrics::gauge!("proxy_active_connections").decrement(1.0);
}
