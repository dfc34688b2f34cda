//! Domain types for the hub client.

pub mod config;
pub mod correlation;
pub mod methods;

pub use config::{ClientConfig, ConfigError};
pub use correlation::RequestId;
pub use methods::HubMethod;
