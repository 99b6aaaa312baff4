//! Prometheus metrics for the limiter.
//!
//! Metrics are exposed via a dedicated HTTP listener when `METRICS_PORT` is
//! set to a non-zero value. The recording functions are safe to call when no
//! exporter is installed; they become no-ops.
//!
//! # Available Metrics
//!
//! ## Counters
//! - `window_gate_requests_admitted_total` - Requests let through to the handler
//! - `window_gate_requests_rejected_total` - Requests answered with 429
//! - `window_gate_window_resets_total` - Windows closed by the reset task
//!
//! ## Gauges
//! - `window_gate_window_count` - Admissions recorded in the window that just ended

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const REQUESTS_ADMITTED_TOTAL: &str = "window_gate_requests_admitted_total";
    pub const REQUESTS_REJECTED_TOTAL: &str = "window_gate_requests_rejected_total";
    pub const WINDOW_RESETS_TOTAL: &str = "window_gate_window_resets_total";
    pub const WINDOW_COUNT: &str = "window_gate_window_count";
}

/// Install the Prometheus exporter and describe all metrics.
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        names::REQUESTS_ADMITTED_TOTAL,
        "Total number of requests admitted by the rate limiter"
    );
    describe_counter!(
        names::REQUESTS_REJECTED_TOTAL,
        "Total number of requests rejected with 429"
    );
    describe_counter!(
        names::WINDOW_RESETS_TOTAL,
        "Total number of rate limit windows reset"
    );
    describe_gauge!(
        names::WINDOW_COUNT,
        "Requests admitted in the most recently closed window"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

pub fn record_request_admitted() {
    counter!(names::REQUESTS_ADMITTED_TOTAL).increment(1);
}

pub fn record_request_rejected() {
    counter!(names::REQUESTS_REJECTED_TOTAL).increment(1);
}

/// Record a window reset along with the count it cleared.
pub fn record_window_reset(cleared: u32) {
    counter!(names::WINDOW_RESETS_TOTAL).increment(1);
    gauge!(names::WINDOW_COUNT).set(f64::from(cleared));
}
