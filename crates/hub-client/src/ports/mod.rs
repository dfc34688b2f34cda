//! Ports for the hub client.

pub mod outbound;

pub use outbound::{HubTransport, RawEventStream};
