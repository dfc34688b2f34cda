//! # Local Hub
//!
//! In-process hub: a message store plus an ordered event bus, exposed
//! through the `HubTransport` port.
//!
//! Merges are serialized under the store lock and publish their event
//! before the lock is released, so the bus order is the commit order. A
//! merge that changes nothing (duplicate message, identical registry event)
//! publishes nothing.

use crate::adapters::store::{MessageFamily, MessageStore};
use crate::domain::{ClientConfig, HubMethod};
use crate::ports::{HubTransport, RawEventStream};
use crate::rpc::{HubRequest, HubResponse};
use async_trait::async_trait;
use hub_bus::{
    BusConfig, EventFilters, HubEvent, InMemoryEventBus, SubscribeRequest, Subscription,
    SubscriptionEnd,
};
use hub_types::wire::RawCastId;
use hub_types::{
    bytes_to_hex, decode_message, encode_id_registry_event, encode_message,
    encode_name_registry_event, CastId, HubError, HubResult, IdRegistryEvent, Message,
    NameRegistryEvent, ReactionType, UserDataType,
};
use parking_lot::Mutex;
use tracing::{debug, info};

/// In-process hub transport.
pub struct LocalHub {
    store: Mutex<MessageStore>,
    bus: InMemoryEventBus,
}

fn cast_id(raw: &RawCastId) -> CastId {
    CastId {
        fid: raw.fid,
        ts_hash: bytes_to_hex(&raw.ts_hash),
    }
}

fn reaction_type(value: i32) -> HubResult<Option<ReactionType>> {
    if value == 0 {
        return Ok(None);
    }
    ReactionType::try_from(value)
        .map(Some)
        .map_err(|v| HubError::invalid_input(format!("reactionType: unknown value {v}")))
}

fn found<T>(value: Option<T>, what: &str) -> HubResult<T> {
    value.ok_or_else(|| HubError::NotFound(what.to_string()))
}

fn one(message: Option<&Message>, what: &str) -> HubResult<HubResponse> {
    Ok(HubResponse::Message(encode_message(found(message, what)?)?))
}

fn many(messages: Vec<Message>) -> HubResult<HubResponse> {
    messages
        .iter()
        .map(encode_message)
        .collect::<HubResult<Vec<_>>>()
        .map(HubResponse::Messages)
}

impl LocalHub {
    pub fn new() -> Self {
        Self::with_bus_config(BusConfig::default())
    }

    /// Hub whose per-subscriber buffers follow `config.subscription_buffer`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_bus_config(config.bus_config())
    }

    pub fn with_bus_config(config: BusConfig) -> Self {
        Self {
            store: Mutex::new(MessageStore::new()),
            bus: InMemoryEventBus::from_config(&config),
        }
    }

    /// Number of stored messages.
    pub fn message_count(&self) -> usize {
        self.store.lock().len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus.subscriber_count()
    }

    /// Merge a message. Returns false, publishing nothing, if it was
    /// already merged.
    pub fn merge_message(&self, message: Message) -> bool {
        let mut store = self.store.lock();
        if !store.insert(message.clone()) {
            debug!(hash = %message.hash, "Duplicate merge ignored");
            return false;
        }
        debug!(
            fid = message.fid(),
            message_type = %message.message_type(),
            hash = %message.hash,
            "Message merged"
        );
        self.bus.dispatch(HubEvent::MergeMessage(message));
        true
    }

    pub fn merge_id_registry_event(&self, event: IdRegistryEvent) -> bool {
        let mut store = self.store.lock();
        if !store.put_id_registry_event(event.clone()) {
            return false;
        }
        debug!(fid = event.fid, block_number = event.block_number, "Id registry event merged");
        self.bus.dispatch(HubEvent::MergeIdRegistryEvent(event));
        true
    }

    pub fn merge_name_registry_event(&self, event: NameRegistryEvent) -> bool {
        let mut store = self.store.lock();
        if !store.put_name_registry_event(event.clone()) {
            return false;
        }
        debug!(fname = %event.fname, block_number = event.block_number, "Name registry event merged");
        self.bus.dispatch(HubEvent::MergeNameRegistryEvent(event));
        true
    }

    /// Remove a message for capacity reasons. Returns false if unknown.
    pub fn prune_message(&self, hash: &str) -> bool {
        let mut store = self.store.lock();
        let Some(message) = store.remove(hash) else {
            return false;
        };
        debug!(hash = %hash, "Message pruned");
        self.bus.dispatch(HubEvent::PruneMessage(message));
        true
    }

    /// Remove a message whose signer was revoked. Returns false if unknown.
    pub fn revoke_message(&self, hash: &str) -> bool {
        let mut store = self.store.lock();
        let Some(message) = store.remove(hash) else {
            return false;
        };
        debug!(hash = %hash, "Message revoked");
        self.bus.dispatch(HubEvent::RevokeMessage(message));
        true
    }

    /// Close every open event feed, as a hub shutting down would.
    pub fn close_subscriptions(&self) {
        info!(subscribers = self.bus.subscriber_count(), "Closing event feeds");
        self.bus.close();
    }

    fn submit(&self, raw: &hub_types::RawMessage) -> HubResult<HubResponse> {
        let message = decode_message(raw)?;
        self.merge_message(message.clone());
        Ok(HubResponse::Message(encode_message(&message)?))
    }

    fn answer(&self, method: HubMethod, request: HubRequest) -> HubResult<HubResponse> {
        use HubMethod as M;
        use HubRequest as R;

        if let (M::SubmitMessage, R::Message(raw)) = (method, &request) {
            return self.submit(raw);
        }

        let store = self.store.lock();
        match (method, request) {
            (M::GetCast, R::CastId(id)) => one(store.cast(id.fid, &bytes_to_hex(&id.ts_hash)), "cast"),
            (M::GetCastsByFid, R::Fid(r)) => many(store.casts_by_fid(r.fid)),
            (M::GetCastsByParent, R::CastId(id)) => many(store.casts_by_parent(&cast_id(&id))),
            (M::GetCastsByMention, R::Fid(r)) => many(store.casts_by_mention(r.fid)),

            (M::GetAmp, R::Amp(r)) => one(store.amp(r.fid, r.target_fid), "amp"),
            (M::GetAmpsByFid, R::Fid(r)) => many(store.amps_by_fid(r.fid)),
            (M::GetAmpsByUser, R::Fid(r)) => many(store.amps_by_user(r.fid)),

            (M::GetReaction, R::Reaction(r)) => {
                let kind = reaction_type(r.reaction_type)?
                    .ok_or_else(|| HubError::invalid_input("reactionType: required"))?;
                one(store.reaction(r.fid, kind, &cast_id(&r.cast_id)), "reaction")
            }
            (M::GetReactionsByFid, R::ReactionsByFid(r)) => {
                many(store.reactions_by_fid(r.fid, reaction_type(r.reaction_type)?))
            }
            (M::GetReactionsByCast, R::ReactionsByCast(r)) => many(
                store.reactions_by_cast(&cast_id(&r.cast_id), reaction_type(r.reaction_type)?),
            ),

            (M::GetVerification, R::Verification(r)) => one(
                store.verification(r.fid, &bytes_to_hex(&r.address)),
                "verification",
            ),
            (M::GetVerificationsByFid, R::Fid(r)) => many(store.verifications_by_fid(r.fid)),

            (M::GetSigner, R::Signer(r)) => {
                one(store.signer(r.fid, &bytes_to_hex(&r.signer)), "signer")
            }
            (M::GetSignersByFid, R::Fid(r)) => many(store.signers_by_fid(r.fid)),

            (M::GetUserData, R::UserData(r)) => {
                let kind = UserDataType::try_from(r.user_data_type).map_err(|v| {
                    HubError::invalid_input(format!("userDataType: unknown value {v}"))
                })?;
                one(store.user_data(r.fid, kind), "user data")
            }
            (M::GetUserDataByFid, R::Fid(r)) => many(store.user_data_by_fid(r.fid)),

            (M::GetIdRegistryEvent, R::Fid(r)) => {
                let event = found(store.id_registry_event(r.fid), "id registry event")?;
                Ok(HubResponse::IdRegistryEvent(encode_id_registry_event(event)?))
            }
            (M::GetNameRegistryEvent, R::NameRegistryEvent(r)) => {
                let fname = String::from_utf8_lossy(&r.fname);
                let event = found(store.name_registry_event(&fname), "name registry event")?;
                Ok(HubResponse::NameRegistryEvent(encode_name_registry_event(event)?))
            }

            (M::GetAllCastMessagesByFid, R::Fid(r)) => {
                many(store.all_by_fid(r.fid, MessageFamily::Cast))
            }
            (M::GetAllAmpMessagesByFid, R::Fid(r)) => {
                many(store.all_by_fid(r.fid, MessageFamily::Amp))
            }
            (M::GetAllReactionMessagesByFid, R::Fid(r)) => {
                many(store.all_by_fid(r.fid, MessageFamily::Reaction))
            }
            (M::GetAllVerificationMessagesByFid, R::Fid(r)) => {
                many(store.all_by_fid(r.fid, MessageFamily::Verification))
            }
            (M::GetAllSignerMessagesByFid, R::Fid(r)) => {
                many(store.all_by_fid(r.fid, MessageFamily::Signer))
            }
            (M::GetAllUserDataMessagesByFid, R::Fid(r)) => {
                many(store.all_by_fid(r.fid, MessageFamily::UserData))
            }

            (method, request) => Err(HubError::transport(format!(
                "{method}: unexpected {} request",
                request.kind()
            ))),
        }
    }
}

impl Default for LocalHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapt a bus subscription to the transport's raw feed. A faulted
/// subscription yields its error once before ending.
fn raw_feed(subscription: Subscription) -> RawEventStream {
    let feed = futures::stream::unfold(Some(subscription), |state| async move {
        let mut subscription = state?;
        match subscription.recv().await {
            Some(event) => Some((event.to_raw(), Some(subscription))),
            None => match subscription.termination() {
                Some(SubscriptionEnd::Failed(error)) => Some((Err(error), None)),
                _ => None,
            },
        }
    });
    Box::pin(feed)
}

#[async_trait]
impl HubTransport for LocalHub {
    async fn call(&self, method: HubMethod, request: HubRequest) -> HubResult<HubResponse> {
        self.answer(method, request)
    }

    async fn subscribe(&self, request: SubscribeRequest) -> HubResult<RawEventStream> {
        let filters = EventFilters::from_request(&request)?;
        Ok(raw_feed(self.bus.subscribe(filters)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::FidRequest;
    use hub_bus::{EventPublisher, EventType};
    use hub_crypto::Ed25519KeyPair;
    use hub_types::{AmpBody, FarcasterNetwork, MessageBody, MessageBuilder};
    use tokio_stream::StreamExt;

    fn amp(user: u64) -> Message {
        let key = Ed25519KeyPair::from_seed([1u8; 32]);
        MessageBuilder::new(FarcasterNetwork::Devnet, 5)
            .with_timestamp(user as u32)
            .build(MessageBody::AmpAdd(AmpBody { user }), &key)
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_merge_is_noop() {
        let hub = LocalHub::new();
        let message = amp(6);

        assert!(hub.merge_message(message.clone()));
        assert!(!hub.merge_message(message));
        assert_eq!(hub.message_count(), 1);
        assert_eq!(hub.bus.events_published(), 1);
    }

    #[tokio::test]
    async fn test_unknown_prune_is_noop() {
        let hub = LocalHub::new();
        assert!(!hub.prune_message("0x00"));
        assert!(!hub.revoke_message("0x00"));
        assert_eq!(hub.bus.events_published(), 0);
    }

    #[tokio::test]
    async fn test_mismatched_request() {
        let hub = LocalHub::new();
        let err = hub
            .call(HubMethod::GetCast, HubRequest::Fid(FidRequest { fid: 1 }))
            .await
            .unwrap_err();
        assert!(matches!(err, HubError::TransportFailure(_)));
    }

    #[tokio::test]
    async fn test_not_found() {
        let hub = LocalHub::new();
        let err = hub
            .call(HubMethod::GetIdRegistryEvent, HubRequest::fid(1))
            .await
            .unwrap_err();
        assert_eq!(err, HubError::NotFound("id registry event".into()));
    }

    #[test]
    fn test_buffer_from_client_config() {
        let config = ClientConfig {
            subscription_buffer: 8,
            ..ClientConfig::default()
        };
        assert_eq!(LocalHub::from_config(&config).bus.capacity(), 8);
    }

    #[tokio::test]
    async fn test_raw_feed_reports_lag() {
        let hub = LocalHub::with_bus_config(BusConfig { capacity: 1 });
        let mut feed = hub
            .subscribe(EventFilters::of([EventType::MergeMessage]).to_request())
            .await
            .unwrap();

        hub.merge_message(amp(1));
        hub.merge_message(amp(2));

        // buffer held one event; the second faulted the subscriber
        let last = tokio::time::timeout(std::time::Duration::from_millis(200), async {
            let mut items = Vec::new();
            while let Some(item) = feed.next().await {
                items.push(item);
            }
            items
        })
        .await
        .unwrap();

        assert_eq!(last.len(), 1);
        assert!(matches!(last[0], Err(HubError::Unavailable(_))));
    }
}
