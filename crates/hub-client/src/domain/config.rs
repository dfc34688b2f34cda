//! Client configuration with validation.

use hub_bus::BusConfig;
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Default hub RPC port.
pub const DEFAULT_RPC_PORT: u16 = 2283;

/// Default bound on a unary call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Default per-subscriber buffer.
pub const DEFAULT_SUBSCRIPTION_BUFFER: usize = 1000;

/// Hub client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Hub RPC endpoint
    pub rpc_address: SocketAddr,
    /// Upper bound on every unary call
    pub request_timeout: Duration,
    /// Events buffered per subscriber before it is faulted
    pub subscription_buffer: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_RPC_PORT),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            subscription_buffer: DEFAULT_SUBSCRIPTION_BUFFER,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `HUB_RPC_ADDRESS`: Hub endpoint (default: 127.0.0.1:2283)
    /// - `HUB_REQUEST_TIMEOUT_MS`: Unary call timeout (default: 10000)
    /// - `HUB_SUBSCRIPTION_BUFFER`: Per-subscriber buffer (default: 1000)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            rpc_address: env::var("HUB_RPC_ADDRESS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rpc_address),

            request_timeout: env::var("HUB_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),

            subscription_buffer: env::var("HUB_SUBSCRIPTION_BUFFER")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.subscription_buffer),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "request timeout cannot be 0".into(),
            ));
        }

        if self.subscription_buffer == 0 {
            return Err(ConfigError::InvalidLimit(
                "subscription buffer cannot be 0".into(),
            ));
        }

        if self.rpc_address.port() == 0 {
            return Err(ConfigError::Invalid("rpc port cannot be 0".into()));
        }

        Ok(())
    }

    /// Event bus settings derived from this configuration.
    pub fn bus_config(&self) -> BusConfig {
        BusConfig {
            capacity: self.subscription_buffer,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
