//! # Message Builder
//!
//! Produces validly-constructed, signed messages:
//!
//! 1. Encode `data` canonically (bincode of the wire form)
//! 2. `hash` = BLAKE3 of those bytes, truncated to 20 bytes
//! 3. `tsHash` = big-endian timestamp followed by `hash`
//! 4. `signature` = Ed25519 over `hash`

use crate::codec::encode_message_data;
use crate::errors::{HubError, HubResult};
use crate::hex_codec::bytes_to_hex;
use crate::message::{
    FarcasterNetwork, Fid, HashScheme, Message, MessageBody, MessageData, SignatureScheme,
};
use crate::time::now_farcaster_time;
use hub_crypto::{message_hash, ts_hash, Ed25519KeyPair};

/// Builds signed messages for one account on one network.
#[derive(Debug, Clone, Copy)]
pub struct MessageBuilder {
    network: FarcasterNetwork,
    fid: Fid,
    timestamp: Option<u32>,
}

impl MessageBuilder {
    pub fn new(network: FarcasterNetwork, fid: Fid) -> Self {
        Self {
            network,
            fid,
            timestamp: None,
        }
    }

    /// Pin the timestamp instead of reading the clock.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Build and sign a message carrying `body`.
    pub fn build(&self, body: MessageBody, signer: &Ed25519KeyPair) -> HubResult<Message> {
        if self.fid == 0 {
            return Err(HubError::invalid_input("fid: must be positive"));
        }
        let timestamp = match self.timestamp {
            Some(timestamp) => timestamp,
            None => now_farcaster_time()?,
        };

        let data = MessageData {
            fid: self.fid,
            timestamp,
            network: self.network,
            body,
        };

        let canonical = encode_message_data(&data)?.canonical_bytes()?;
        let hash = message_hash(&canonical);
        let signature = signer.sign_hash(&hash);

        Ok(Message {
            data,
            hash: bytes_to_hex(&hash),
            hash_scheme: HashScheme::Blake3,
            signature: bytes_to_hex(signature.as_bytes()),
            signature_scheme: SignatureScheme::Ed25519,
            signer: bytes_to_hex(signer.public_key().as_bytes()),
            ts_hash: bytes_to_hex(&ts_hash(timestamp, &hash)),
        })
    }
}
