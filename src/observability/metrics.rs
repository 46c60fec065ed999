//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rest_requests_total` (counter): requests by verb and status
//! - `rest_request_duration_seconds` (histogram): latency by verb
//!
//! # Design Decisions
//! - Recording is always safe; without an installed recorder the macros
//!   are no-ops
//! - The `verb` label is one of the four REST verbs or `OTHER`, so
//!   arbitrary client methods cannot grow the series count
//! - The Prometheus exporter runs its own listener, separate from the
//!   REST listener

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::selector::Verb;

pub const REQUESTS_TOTAL: &str = "rest_requests_total";
pub const REQUEST_DURATION: &str = "rest_request_duration_seconds";

/// Label for methods outside the REST verb set.
pub const OTHER_VERB: &str = "OTHER";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

fn verb_label(method: &str) -> &'static str {
    Verb::parse(method).map_or(OTHER_VERB, |verb| verb.as_str())
}

/// Record one finished request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let verb = verb_label(method);
    counter!(REQUESTS_TOTAL, "verb" => verb, "status" => status.to_string()).increment(1);
    histogram!(REQUEST_DURATION, "verb" => verb).record(start.elapsed().as_secs_f64());
}
