//! # Event Publisher
//!
//! Ordered fan-out of hub events to registered subscribers.
//!
//! The registration table is the only shared mutable state. Subscribe,
//! unsubscribe and delivery all take its lock, so a publish never races a
//! registration and every subscriber sees events in the order `publish` was
//! entered.

use crate::events::{EventFilters, HubEvent};
use crate::subscriber::{
    EventSubscriber, Subscription, SubscriptionControl, SubscriptionEnd, SubscriptionId,
};
use crate::{BusConfig, DEFAULT_CHANNEL_CAPACITY};
use async_trait::async_trait;
use hub_types::HubError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

/// Trait for publishing events to the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to the bus.
    ///
    /// Returns the number of subscribers the event was delivered to.
    async fn publish(&self, event: HubEvent) -> usize;

    /// Get the total number of events published.
    fn events_published(&self) -> u64;
}

/// A subscriber's entry in the registration table.
pub(crate) struct Registration {
    filter: EventFilters,
    sender: mpsc::Sender<HubEvent>,
    control: Arc<SubscriptionControl>,
}

pub(crate) type RegistrationTable = Mutex<HashMap<SubscriptionId, Registration>>;

/// In-memory implementation of the event bus.
///
/// Each subscriber gets its own bounded buffer. A subscriber that falls a
/// full buffer behind is closed with an `Unavailable` fault rather than
/// silently skipping events.
pub struct InMemoryEventBus {
    registrations: Arc<RegistrationTable>,

    next_id: AtomicU64,

    events_published: AtomicU64,

    /// Per-subscriber buffer size.
    capacity: usize,
}

impl InMemoryEventBus {
    /// Create a new in-memory event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    #[must_use]
    pub fn from_config(config: &BusConfig) -> Self {
        Self::with_capacity(config.capacity)
    }

    /// Create a new in-memory event bus with specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            registrations: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            events_published: AtomicU64::new(0),
            capacity: capacity.max(1),
        }
    }

    /// Register a subscriber. Only events published after this call are
    /// delivered to it.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilters) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.capacity);
        let control = Arc::new(SubscriptionControl::new());

        self.registrations.lock().insert(
            id,
            Registration {
                filter: filter.clone(),
                sender,
                control: control.clone(),
            },
        );

        debug!(subscription_id = id, event_types = ?filter.event_types, "New subscription created");

        Subscription::new(
            id,
            receiver,
            filter,
            control,
            Arc::downgrade(&self.registrations),
        )
    }

    /// Deliver an event to every matching subscriber.
    ///
    /// Synchronous so that callers can publish while holding their own
    /// commit lock.
    pub fn dispatch(&self, event: HubEvent) -> usize {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        let event_type = event.event_type();
        let mut delivered = 0;

        let mut table = self.registrations.lock();
        table.retain(|id, registration| {
            if registration.control.is_closed() {
                return false;
            }
            if !registration.filter.matches(&event) {
                return true;
            }
            match registration.sender.try_send(event.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => {
                    warn!(
                        subscription_id = *id,
                        capacity = self.capacity,
                        "Subscriber lagged, closing subscription"
                    );
                    registration.control.close(SubscriptionEnd::Failed(HubError::Unavailable(
                        "subscriber lagged behind the event feed".into(),
                    )));
                    false
                }
                Err(TrySendError::Closed(_)) => false,
            }
        });

        debug!(
            event_type = %event_type,
            receivers = delivered,
            "Event published"
        );
        delivered
    }

    /// Drop every registration. Subscribers drain what is already buffered
    /// and then complete.
    pub fn close(&self) {
        let closed = {
            let mut table = self.registrations.lock();
            let count = table.len();
            table.clear();
            count
        };
        debug!(subscribers = closed, "Event bus closed");
    }

    /// Get the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registrations.lock().len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: HubEvent) -> usize {
        self.dispatch(event)
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilters) -> Subscription {
        InMemoryEventBus::subscribe(self, filter)
    }
}
