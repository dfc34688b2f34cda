//! Adapters for the hub client.
//!
//! `LocalHub` is an in-process hub behind the `HubTransport` port, backed by
//! `MessageStore` and the event bus.

pub mod local;
pub mod store;

pub use local::LocalHub;
pub use store::{MessageFamily, MessageStore};
