//! # Hub Bus
//!
//! Ordered event fan-out for hub state changes.
//!
//! ```text
//!  merge / prune / revoke          ┌──────────────┐
//!  ───────────publish()──────────▶ │  Event Bus   │ ──filter──▶ Subscription A
//!     (serialized, commit order)   │ registration │ ──filter──▶ Subscription B
//!                                  │    table     │ ──filter──▶ ...
//!                                  └──────────────┘
//! ```
//!
//! Every subscriber observes a filtered sub-sequence of the global publish
//! order. A new subscription sees only events published after it registers.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

pub use events::{matches, EventFilters, EventType, HubEvent, RawEventResponse, SubscribeRequest};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{
    CancelHandle, EventSubscriber, Subscription, SubscriptionControl, SubscriptionEnd,
    SubscriptionId, SubscriptionState,
};

/// Maximum events to buffer per subscriber before it is faulted.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Bus configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Per-subscriber buffer size.
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
