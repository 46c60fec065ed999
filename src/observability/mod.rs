//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP boundary (http/server.rs):
//!     → logging.rs (structured events with request ID, skin, verb, status)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The dispatch core never logs per request; the boundary does
//! - Request ID flows from the request-id layer into every request log

pub mod logging;
pub mod metrics;
