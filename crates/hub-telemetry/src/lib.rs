//! # Hub Telemetry
//!
//! Structured logging bootstrap for the hub crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hub_telemetry::{init_logging, TelemetryConfig};
//!
//! let config = TelemetryConfig::from_env();
//! let _guard = init_logging(&config)?;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `hub-client` | Service name in log lines |
//! | `HUB_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `HUB_JSON_LOGS` | `false` | Emit JSON instead of pretty output |

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging, LoggingGuard};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install logging for tests. Safe to call from every test; only the first
/// call installs a subscriber.
pub fn init_test_logging() {
    let config = TelemetryConfig {
        log_level: "debug".to_string(),
        ..TelemetryConfig::for_service("hub-tests")
    };
    let _ = init_logging(&config);
}
