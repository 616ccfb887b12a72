//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wallet_rpc_requests_total` (counter): RPC calls by chain, method, outcome
//! - `wallet_rpc_duration_seconds` (histogram): RPC latency by chain, method
//! - `wallet_transactions_total` (counter): submitted/confirmed/failed/timeout by chain
//! - `wallet_faucet_responses_total` (counter): faucet answers by source, outcome
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_rpc_call(chain: &str, method: &'static str, success: bool, start: Instant) {
    let outcome = if success { "ok" } else { "error" };
    ::metrics::counter!(
        "wallet_rpc_requests_total",
        "chain" => chain.to_string(),
        "method" => method,
        "outcome" => outcome
    )
    .increment(1);
    ::metrics::histogram!(
        "wallet_rpc_duration_seconds",
        "chain" => chain.to_string(),
        "method" => method
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_transaction(chain: &str, stage: &'static str) {
    ::metrics::counter!(
        "wallet_transactions_total",
        "chain" => chain.to_string(),
        "stage" => stage
    )
    .increment(1);
}

pub fn record_faucet_response(source: &str, success: bool) {
    let outcome = if success { "ok" } else { "error" };
    ::metrics::counter!(
        "wallet_faucet_responses_total",
        "source" => source.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}
