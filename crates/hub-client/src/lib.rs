//! # Hub Client
//!
//! Typed client for a Farcaster-style hub: unary queries and submissions
//! through the `HubClient` facade, and filtered server-push event feeds
//! through `EventStream`.
//!
//! ## Architecture
//!
//! ```text
//! HubClient ──► HubTransport (port) ──► LocalHub (adapter)
//!    │                                     │
//!    │  hex ⇄ bytes, Envelope Codec        ├── MessageStore
//!    ▼                                     └── InMemoryEventBus
//! EventStream ◄──── RawEventStream ◄───────────┘
//! ```
//!
//! Arguments are validated before any transport call. Responses are decoded
//! all-or-nothing: a collection with one bad element fails as a whole.
//!
//! ## Usage
//!
//! ```ignore
//! use hub_client::{ClientConfig, HubClient, LocalHub};
//! use hub_bus::{EventFilters, EventType};
//!
//! let client = HubClient::new(LocalHub::new(), ClientConfig::default())?;
//! let mut events = client
//!     .subscribe(EventFilters::of([EventType::MergeMessage]))
//!     .await?;
//! let casts = client.get_casts_by_fid(2).await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod client;
pub mod domain;
pub mod ports;
pub mod rpc;
pub mod stream;

pub use adapters::{LocalHub, MessageFamily, MessageStore};
pub use client::HubClient;
pub use domain::{ClientConfig, ConfigError, HubMethod, RequestId};
pub use ports::{HubTransport, RawEventStream};
pub use rpc::{HubRequest, HubResponse};
pub use stream::{EventCancelHandle, EventStream};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
