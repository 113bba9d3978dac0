//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rpc_proxy_requests_total` (counter): client requests by outcome, status
//! - `rpc_proxy_request_duration_seconds` (histogram): client-facing latency
//! - `rpc_proxy_cache_hits_total` / `rpc_proxy_cache_misses_total` (counter): by method
//! - `rpc_proxy_cache_entries` (gauge): stored cache entries
//! - `rpc_proxy_upstream_requests_total` (counter): by backend, result
//! - `rpc_proxy_upstream_duration_seconds` (histogram): by backend
//!
//! Recording is a no-op until a recorder is installed with [`init_metrics`].

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed client request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    counter!(
        "rpc_proxy_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("rpc_proxy_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record a cache lookup for a cacheable method.
pub fn record_cache_lookup(method: &str, hit: bool) {
    if hit {
        counter!("rpc_proxy_cache_hits_total", "method" => method.to_string()).increment(1);
    } else {
        counter!("rpc_proxy_cache_misses_total", "method" => method.to_string()).increment(1);
    }
}

/// Record the number of stored cache entries.
pub fn record_cache_size(entries: usize) {
    gauge!("rpc_proxy_cache_entries").set(entries as f64);
}

/// Record one forwarded call.
pub fn record_upstream(backend: &str, success: bool, start: Instant) {
    let result = if success { "ok" } else { "error" };
    counter!(
        "rpc_proxy_upstream_requests_total",
        "backend" => backend.to_string(),
        "result" => result
    )
    .increment(1);
    histogram!("rpc_proxy_upstream_duration_seconds", "backend" => backend.to_string())
        .record(start.elapsed().as_secs_f64());
}
