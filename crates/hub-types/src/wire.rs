//! # Wire Envelope
//!
//! Loosely-typed structs mirroring the binary representation exchanged with
//! the hub. Discriminants stay as raw `i32` and every body kind has its own
//! optional slot (protobuf `oneof` style), so an envelope with an unknown
//! type or a missing body still deserializes and reaches the codec, which
//! decides whether it is acceptable.
//!
//! Byte encoding is bincode over these serde structs.

use crate::errors::{HubError, HubResult};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Reference to another message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCastId {
    pub fid: u64,
    pub ts_hash: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCastAddBody {
    pub text: Option<String>,
    pub embeds: Option<Vec<String>>,
    pub mentions: Option<Vec<u64>>,
    pub parent: Option<RawCastId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCastRemoveBody {
    pub target_ts_hash: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReactionBody {
    pub target: Option<RawCastId>,
    pub reaction_type: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAmpBody {
    pub user: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVerificationAddEthAddressBody {
    pub address: Vec<u8>,
    pub eth_signature: Vec<u8>,
    pub block_hash: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawVerificationRemoveBody {
    pub address: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSignerBody {
    pub signer: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawUserDataBody {
    pub user_data_type: i32,
    pub value: Option<String>,
}

/// Signed portion of a wire message. At most one body slot is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessageData {
    pub message_type: i32,
    pub fid: u64,
    pub timestamp: u32,
    pub network: i32,
    pub cast_add_body: Option<RawCastAddBody>,
    pub cast_remove_body: Option<RawCastRemoveBody>,
    pub reaction_body: Option<RawReactionBody>,
    pub amp_body: Option<RawAmpBody>,
    pub verification_add_eth_address_body: Option<RawVerificationAddEthAddressBody>,
    pub verification_remove_body: Option<RawVerificationRemoveBody>,
    pub signer_body: Option<RawSignerBody>,
    pub user_data_body: Option<RawUserDataBody>,
}

impl RawMessageData {
    /// Number of populated body slots.
    #[must_use]
    pub fn body_count(&self) -> usize {
        [
            self.cast_add_body.is_some(),
            self.cast_remove_body.is_some(),
            self.reaction_body.is_some(),
            self.amp_body.is_some(),
            self.verification_add_eth_address_body.is_some(),
            self.verification_remove_body.is_some(),
            self.signer_body.is_some(),
            self.user_data_body.is_some(),
        ]
        .into_iter()
        .filter(|present| *present)
        .count()
    }

    /// Canonical byte encoding, the input to the message hash.
    pub fn canonical_bytes(&self) -> HubResult<Vec<u8>> {
        encode_wire(self, "data")
    }
}

/// Complete wire envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub data: Option<RawMessageData>,
    pub hash: Vec<u8>,
    pub hash_scheme: i32,
    pub signature: Vec<u8>,
    pub signature_scheme: i32,
    pub signer: Vec<u8>,
    pub ts_hash: Vec<u8>,
}

impl RawMessage {
    /// Serialize for transmission.
    pub fn to_bytes(&self) -> HubResult<Vec<u8>> {
        encode_wire(self, "envelope")
    }

    /// Parse a received envelope. Only the framing is checked here.
    pub fn from_bytes(bytes: &[u8]) -> HubResult<Self> {
        decode_wire(bytes, "envelope")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIdRegistryEvent {
    pub block_number: u64,
    pub block_hash: Vec<u8>,
    pub transaction_hash: Vec<u8>,
    pub log_index: u32,
    pub fid: u64,
    pub to: Vec<u8>,
    pub event_type: i32,
    pub from: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNameRegistryEvent {
    pub block_number: u64,
    pub block_hash: Vec<u8>,
    pub transaction_hash: Vec<u8>,
    pub log_index: u32,
    pub fname: Vec<u8>,
    pub from: Vec<u8>,
    pub to: Vec<u8>,
    pub event_type: i32,
    pub expiry: u64,
}

/// bincode-encode a wire value.
pub fn encode_wire<T: Serialize>(value: &T, what: &str) -> HubResult<Vec<u8>> {
    bincode::serialize(value).map_err(|_| HubError::malformed_envelope(what))
}

/// bincode-decode a wire value.
pub fn decode_wire<T: DeserializeOwned>(bytes: &[u8], what: &str) -> HubResult<T> {
    bincode::deserialize(bytes).map_err(|_| HubError::malformed_envelope(what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_count() {
        let mut data = RawMessageData::default();
        assert_eq!(data.body_count(), 0);

        data.amp_body = Some(RawAmpBody { user: 7 });
        assert_eq!(data.body_count(), 1);

        data.signer_body = Some(RawSignerBody::default());
        assert_eq!(data.body_count(), 2);
    }

    #[test]
    fn test_unknown_type_survives_framing() {
        let raw = RawMessage {
            data: Some(RawMessageData {
                message_type: 42,
                ..Default::default()
            }),
            ..Default::default()
        };

        let bytes = raw.to_bytes().unwrap();
        let parsed = RawMessage::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.data.unwrap().message_type, 42);
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        let raw = RawMessage {
            hash: vec![1; 20],
            ..Default::default()
        };
        let bytes = raw.to_bytes().unwrap();

        let err = RawMessage::from_bytes(&bytes[..bytes.len() - 3]).unwrap_err();
        assert_eq!(err, HubError::malformed_envelope("envelope"));
    }
}
