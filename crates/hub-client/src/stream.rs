//! # Subscription Stream Adapter
//!
//! Turns the transport's raw push feed into an ordered, cancellable
//! sequence of typed events for one subscriber.
//!
//! Raw events are decoded in arrival order and passed through the
//! subscriber's filter. A transport fault or an undecodable event is
//! yielded once as `Err`, after which the stream ends with
//! `SubscriptionEnd::Failed`. A clean end of the feed yields `None` with
//! `SubscriptionEnd::Completed`.

use crate::ports::RawEventStream;
use hub_bus::{EventFilters, HubEvent, SubscriptionControl, SubscriptionEnd, SubscriptionState};
use hub_types::{HubError, HubResult};
use parking_lot::Mutex;
use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, warn};

/// Transport feed shared between a stream and its cancel handles.
type SharedFeed = Arc<Mutex<Option<RawEventStream>>>;

/// Drop the feed outside the lock. Dropping it releases the transport's
/// registration.
fn release(feed: &Mutex<Option<RawEventStream>>) {
    let released = feed.lock().take();
    drop(released);
}

/// Typed event feed for one subscriber.
pub struct EventStream {
    feed: SharedFeed,
    filters: EventFilters,
    control: Arc<SubscriptionControl>,
}

/// Cloneable handle that cancels an `EventStream` from any task.
///
/// Cancelling releases the transport feed immediately, so the hub stops
/// delivering to this subscriber even if the stream is never polled again.
#[derive(Clone)]
pub struct EventCancelHandle {
    feed: SharedFeed,
    control: Arc<SubscriptionControl>,
}

impl EventCancelHandle {
    pub fn cancel(&self) {
        if self.control.close(SubscriptionEnd::Cancelled) {
            debug!("Event stream cancelled");
        }
        release(&self.feed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.control.end() == Some(SubscriptionEnd::Cancelled)
    }
}

impl fmt::Debug for EventCancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCancelHandle")
            .field("state", &self.control.state())
            .finish_non_exhaustive()
    }
}

impl EventStream {
    pub fn new(inner: RawEventStream, filters: EventFilters) -> Self {
        Self {
            feed: Arc::new(Mutex::new(Some(inner))),
            filters,
            control: Arc::new(SubscriptionControl::new()),
        }
    }

    pub fn filters(&self) -> &EventFilters {
        &self.filters
    }

    pub fn state(&self) -> SubscriptionState {
        self.control.state()
    }

    /// Why the stream ended; `None` while it is live.
    pub fn termination(&self) -> Option<SubscriptionEnd> {
        self.control.end()
    }

    /// Handle for cancelling from another task.
    pub fn cancel_handle(&self) -> EventCancelHandle {
        EventCancelHandle {
            feed: self.feed.clone(),
            control: self.control.clone(),
        }
    }

    /// Cancel now and release the transport feed. Events already in flight
    /// are dropped.
    pub fn cancel(&mut self) {
        self.cancel_handle().cancel();
    }

    /// Next event, `None` once closed.
    pub async fn recv(&mut self) -> Option<HubResult<HubEvent>> {
        self.next().await
    }

    fn fail(control: &SubscriptionControl, error: HubError) -> Poll<Option<HubResult<HubEvent>>> {
        warn!(error = %error, "Subscription failed");
        control.close(SubscriptionEnd::Failed(error.clone()));
        Poll::Ready(Some(Err(error)))
    }
}

impl Stream for EventStream {
    type Item = HubResult<HubEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        this.control.register(cx.waker());

        let mut feed = this.feed.lock();
        if this.control.is_closed() {
            let released = feed.take();
            drop(feed);
            drop(released);
            return Poll::Ready(None);
        }

        loop {
            let Some(inner) = feed.as_mut() else {
                return Poll::Ready(None);
            };

            match inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(raw))) => match HubEvent::from_raw(&raw) {
                    Ok(event) => {
                        if !this.filters.matches(&event) {
                            continue;
                        }
                        this.control.mark_streaming();
                        return Poll::Ready(Some(Ok(event)));
                    }
                    Err(e) => {
                        feed.take();
                        return Self::fail(&this.control, e);
                    }
                },
                Poll::Ready(Some(Err(e))) => {
                    feed.take();
                    return Self::fail(&this.control, e);
                }
                Poll::Ready(None) => {
                    debug!("Event feed completed");
                    this.control.close(SubscriptionEnd::Completed);
                    feed.take();
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.control.close(SubscriptionEnd::Cancelled);
        release(&self.feed);
    }
}
