//! # Event Subscriber
//!
//! Per-subscriber state machine:
//!
//! ```text
//! Open ──first delivered event──▶ Streaming
//!   │                                │
//!   └──cancel / transport end / fault┴──▶ Closed
//! ```
//!
//! Once `Closed`, nothing more is yielded, including events already sitting
//! in the subscriber's buffer. The terminal signal records why the
//! subscription ended, and the first one recorded wins.

use crate::events::{EventFilters, HubEvent};
use crate::publisher::RegistrationTable;
use futures::task::AtomicWaker;
use hub_types::HubError;
use parking_lot::Mutex;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll, Waker};
use tokio::sync::mpsc;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

/// Identifier of a registered subscriber.
pub type SubscriptionId = u64;

/// Lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Registered, nothing delivered yet.
    Open,
    /// At least one event delivered.
    Streaming,
    /// Terminal.
    Closed,
}

/// Why a subscription reached `Closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionEnd {
    /// The subscriber cancelled.
    Cancelled,
    /// The event source closed cleanly.
    Completed,
    /// The feed failed; carries the fault.
    Failed(HubError),
}

impl SubscriptionEnd {
    /// True if the subscription ended because of a fault.
    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
struct ControlState {
    state: SubscriptionState,
    end: Option<SubscriptionEnd>,
}

/// Shared lifecycle of one subscription, visible to both the producer side
/// and the consumer side.
#[derive(Debug)]
pub struct SubscriptionControl {
    inner: Mutex<ControlState>,
    waker: AtomicWaker,
}

impl SubscriptionControl {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(ControlState {
                state: SubscriptionState::Open,
                end: None,
            }),
            waker: AtomicWaker::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        self.inner.lock().state
    }

    /// Terminal signal, once closed.
    #[must_use]
    pub fn end(&self) -> Option<SubscriptionEnd> {
        self.inner.lock().end.clone()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state() == SubscriptionState::Closed
    }

    /// Record that an event was delivered.
    pub fn mark_streaming(&self) {
        let mut inner = self.inner.lock();
        if inner.state == SubscriptionState::Open {
            inner.state = SubscriptionState::Streaming;
        }
    }

    /// Move to `Closed`. Returns false if already closed.
    pub fn close(&self, end: SubscriptionEnd) -> bool {
        {
            let mut inner = self.inner.lock();
            if inner.state == SubscriptionState::Closed {
                return false;
            }
            inner.state = SubscriptionState::Closed;
            inner.end = Some(end);
        }
        self.waker.wake();
        true
    }

    /// Register the consumer task to be woken on close.
    pub fn register(&self, waker: &Waker) {
        self.waker.register(waker);
    }
}

impl Default for SubscriptionControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle that cancels a subscription from any task.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    control: Arc<SubscriptionControl>,
}

impl CancelHandle {
    #[must_use]
    pub fn new(control: Arc<SubscriptionControl>) -> Self {
        Self { control }
    }

    pub fn cancel(&self) {
        if self.control.close(SubscriptionEnd::Cancelled) {
            debug!("Subscription cancelled");
        }
    }
}

/// Trait for subscribing to events from the bus.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe to events matching a filter.
    fn subscribe(&self, filter: EventFilters) -> Subscription;
}

/// A subscription handle for receiving events.
///
/// Yields matching events in publish order. When dropped, the registration
/// is removed from the bus.
pub struct Subscription {
    id: SubscriptionId,
    receiver: mpsc::Receiver<HubEvent>,
    filter: EventFilters,
    control: Arc<SubscriptionControl>,
    registrations: Weak<RegistrationTable>,
}

impl Subscription {
    pub(crate) fn new(
        id: SubscriptionId,
        receiver: mpsc::Receiver<HubEvent>,
        filter: EventFilters,
        control: Arc<SubscriptionControl>,
        registrations: Weak<RegistrationTable>,
    ) -> Self {
        Self {
            id,
            receiver,
            filter,
            control,
            registrations,
        }
    }

    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    #[must_use]
    pub fn filter(&self) -> &EventFilters {
        &self.filter
    }

    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        self.control.state()
    }

    /// Terminal signal, `None` while the subscription is live.
    #[must_use]
    pub fn termination(&self) -> Option<SubscriptionEnd> {
        self.control.end()
    }

    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle::new(self.control.clone())
    }

    /// Cancel now. Buffered events are discarded.
    pub fn cancel(&mut self) {
        self.cancel_handle().cancel();
        self.deregister();
    }

    /// Receive the next event.
    ///
    /// Returns `None` once the subscription is closed.
    pub async fn recv(&mut self) -> Option<HubEvent> {
        self.next().await
    }

    fn deregister(&self) {
        if let Some(table) = self.registrations.upgrade() {
            table.lock().remove(&self.id);
        }
    }
}

impl Stream for Subscription {
    type Item = HubEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        this.control.register(cx.waker());

        if this.control.is_closed() {
            return Poll::Ready(None);
        }

        match this.receiver.poll_recv(cx) {
            Poll::Ready(Some(event)) => {
                this.control.mark_streaming();
                Poll::Ready(Some(event))
            }
            Poll::Ready(None) => {
                // Sender side gone: the bus shut down or dropped us.
                this.control.close(SubscriptionEnd::Completed);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.control.close(SubscriptionEnd::Cancelled);
        self.deregister();
        debug!(subscription_id = self.id, "Subscription dropped");
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .field("state", &self.state())
            .finish()
    }
}
