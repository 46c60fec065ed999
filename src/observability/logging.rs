//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global tracing subscriber once per process
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Human-readable `fmt` output on stdout
//! - A second initialization (tests, embedding) is a no-op

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. `level` is an `EnvFilter` directive such
/// as `info` or `restskin=debug,tower_http=info`.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init("debug");
        init("not a [valid directive");
        tracing::info!("still logging");
    }
}
