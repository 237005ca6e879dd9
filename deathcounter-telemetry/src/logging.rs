//! ## deathcounter-telemetry::logging
//! **`tracing` subscriber setup**
//!
//! `RUST_LOG` wins over the configured level so operators can turn up a
//! single module without editing config. Logs go to stderr; stdout belongs
//! to whatever the host prints for players.

use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber. Call once, before the first event.
    pub fn init(default_level: &str) {
        fmt()
            .with_env_filter(Self::filter(default_level))
            .with_target(false)
            .with_writer(std::io::stderr)
            .init()
    }

    /// Like [`init`](Self::init) but returns `false` instead of panicking
    /// when a global subscriber is already installed.
    pub fn try_init(default_level: &str) -> bool {
        fmt()
            .with_env_filter(Self::filter(default_level))
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    }

    fn filter(default_level: &str) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    }
}
