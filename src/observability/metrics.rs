//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_requests_total` (counter): translated requests by operation, status
//! - `bridge_request_duration_seconds` (histogram): end-to-end handler latency
//! - `bridge_rpc_failures_total` (counter): failed remote calls by operation
//! - `bridge_route_misses_total` (counter): requests answered by the 404 responder

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one translated request.
pub fn record_request(operation: &'static str, status: u16, start: Instant) {
    counter!(
        "bridge_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("bridge_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_rpc_failure(operation: &'static str) {
    counter!("bridge_rpc_failures_total", "operation" => operation).increment(1);
}

pub fn record_route_miss() {
    counter!("bridge_route_misses_total").increment(1);
}
