//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): requests by route and status
//! - `router_dispatch_duration_seconds` (histogram): time spent matching the
//!   path against the route table, excluding the handler
//!
//! Requests that match nothing are labelled with route `none`.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Route label used when no route matched.
pub const NO_ROUTE: &str = "none";

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one dispatched request and how long matching took.
pub fn record_request(route: &str, status: u16, dispatch_time: Duration) {
    metrics::counter!(
        "router_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("router_dispatch_duration_seconds", "route" => route.to_string())
        .record(dispatch_time.as_secs_f64());
}
