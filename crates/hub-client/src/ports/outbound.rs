//! Outbound port: the transport to a hub.

use crate::domain::HubMethod;
use crate::rpc::{HubRequest, HubResponse};
use async_trait::async_trait;
use hub_bus::{RawEventResponse, SubscribeRequest};
use hub_types::HubResult;
use std::pin::Pin;
use tokio_stream::Stream;

/// Push feed of raw events. An `Err` item is a transport fault.
pub type RawEventStream = Pin<Box<dyn Stream<Item = HubResult<RawEventResponse>> + Send>>;

/// Transport to a hub.
///
/// Implementations report connection problems as `TransportFailure` and
/// pass through `NotFound` / `Unavailable` from the hub unchanged.
#[async_trait]
pub trait HubTransport: Send + Sync {
    /// Unary call.
    async fn call(&self, method: HubMethod, request: HubRequest) -> HubResult<HubResponse>;

    /// Open a server-push event feed. Dropping the stream cancels it.
    async fn subscribe(&self, request: SubscribeRequest) -> HubResult<RawEventStream>;
}
