//! Shared fixtures: deterministic keys, signed messages, registry events and
//! stream helpers.

use hub_bus::HubEvent;
use hub_client::{ClientConfig, EventStream, HubClient, LocalHub};
use hub_crypto::Ed25519KeyPair;
use hub_types::{
    bytes_to_hex, AmpBody, CastAddBody, FarcasterNetwork, Fid, HubResult,
    IdRegistryEvent, IdRegistryEventType, Message, MessageBody, MessageBuilder,
    NameRegistryEvent, NameRegistryEventType, ReactionBody, ReactionType, SignerBody,
    UserDataBody, UserDataType, VerificationAddEthAddressBody,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// How long a test waits for an event that should arrive.
pub const EVENT_TIMEOUT: Duration = Duration::from_millis(500);

/// How long a test waits to be sure nothing else arrives.
pub const QUIET_PERIOD: Duration = Duration::from_millis(50);

pub fn key(seed: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed([seed; 32])
}

fn hex_of(byte: u8, len: usize) -> String {
    bytes_to_hex(&vec![byte; len])
}

pub fn build(fid: Fid, timestamp: u32, body: MessageBody) -> Message {
    MessageBuilder::new(FarcasterNetwork::Devnet, fid)
        .with_timestamp(timestamp)
        .build(body, &key(fid as u8))
        .expect("fixture message must build")
}

pub fn signer_add(fid: Fid, timestamp: u32, delegate: &Ed25519KeyPair) -> Message {
    build(
        fid,
        timestamp,
        MessageBody::SignerAdd(SignerBody {
            signer: bytes_to_hex(delegate.public_key().as_bytes()),
        }),
    )
}

pub fn cast_add(fid: Fid, timestamp: u32, text: &str) -> Message {
    build(
        fid,
        timestamp,
        MessageBody::CastAdd(CastAddBody {
            text: text.to_string(),
            embeds: None,
            mentions: None,
            parent: None,
        }),
    )
}

pub fn reply(fid: Fid, timestamp: u32, parent: &Message, mentions: Vec<Fid>) -> Message {
    build(
        fid,
        timestamp,
        MessageBody::CastAdd(CastAddBody {
            text: format!("reply {timestamp}"),
            embeds: Some(vec!["https://example.com/a.png".into()]),
            mentions: Some(mentions),
            parent: Some(parent.cast_id()),
        }),
    )
}

pub fn reaction(fid: Fid, timestamp: u32, kind: ReactionType, target: &Message) -> Message {
    build(
        fid,
        timestamp,
        MessageBody::ReactionAdd(ReactionBody {
            target: target.cast_id(),
            reaction_type: kind,
        }),
    )
}

pub fn amp(fid: Fid, timestamp: u32, user: Fid) -> Message {
    build(fid, timestamp, MessageBody::AmpAdd(AmpBody { user }))
}

pub fn eth_address(byte: u8) -> String {
    hex_of(byte, 20)
}

pub fn verification(fid: Fid, timestamp: u32, address_byte: u8) -> Message {
    build(
        fid,
        timestamp,
        MessageBody::VerificationAddEthAddress(VerificationAddEthAddressBody {
            address: eth_address(address_byte),
            eth_signature: hex_of(0x5E, 65),
            block_hash: hex_of(0xB1, 32),
        }),
    )
}

pub fn user_data(fid: Fid, timestamp: u32, kind: UserDataType, value: &str) -> Message {
    build(
        fid,
        timestamp,
        MessageBody::UserDataAdd(UserDataBody {
            user_data_type: kind,
            value: value.to_string(),
        }),
    )
}

pub fn id_registry_event(fid: Fid, block_number: u64) -> IdRegistryEvent {
    IdRegistryEvent {
        block_number,
        block_hash: hex_of(0x0B, 32),
        transaction_hash: hex_of(0x0C, 32),
        log_index: 0,
        fid,
        to: eth_address(fid as u8),
        event_type: IdRegistryEventType::Register,
        from: None,
    }
}

pub fn name_registry_event(fname: &str, block_number: u64) -> NameRegistryEvent {
    NameRegistryEvent {
        block_number,
        block_hash: hex_of(0x0D, 32),
        transaction_hash: hex_of(0x0E, 32),
        log_index: 1,
        fname: fname.to_string(),
        from: Some(eth_address(0x01)),
        to: eth_address(0x02),
        event_type: NameRegistryEventType::Transfer,
        expiry: 1_700_000_000,
    }
}

/// A local hub and a client sharing it.
pub fn local_client() -> (Arc<LocalHub>, HubClient<LocalHub>) {
    local_client_with(LocalHub::new())
}

pub fn local_client_with(hub: LocalHub) -> (Arc<LocalHub>, HubClient<LocalHub>) {
    hub_telemetry::init_test_logging();
    let hub = Arc::new(hub);
    let client = HubClient::from_shared(hub.clone(), ClientConfig::default())
        .expect("default config is valid");
    (hub, client)
}

/// Next item from the stream, failing the test if none arrives in time.
pub async fn next_event(stream: &mut EventStream) -> Option<HubResult<HubEvent>> {
    timeout(EVENT_TIMEOUT, stream.recv())
        .await
        .expect("timeout waiting for event")
}

/// Next event, which must be a successful one.
pub async fn expect_event(stream: &mut EventStream) -> HubEvent {
    next_event(stream)
        .await
        .expect("stream ended early")
        .expect("stream faulted")
}

/// True if nothing arrives within the quiet period.
pub async fn is_quiet(stream: &mut EventStream) -> bool {
    timeout(QUIET_PERIOD, stream.recv()).await.is_err()
}
