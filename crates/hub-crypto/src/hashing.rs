//! # Message Hashing
//!
//! Hub messages are identified by a BLAKE3 digest of their canonical data
//! encoding, truncated to 160 bits. The `tsHash` ordering key prefixes that
//! digest with the big-endian network timestamp so that byte-wise ordering
//! of keys follows message time.

/// Length of a truncated message hash in bytes.
pub const HASH_LENGTH: usize = 20;

/// Length of a `tsHash` in bytes (4-byte timestamp + message hash).
pub const TS_HASH_LENGTH: usize = 4 + HASH_LENGTH;

/// Truncated BLAKE3 message digest.
pub type MessageHash = [u8; HASH_LENGTH];

/// Timestamp-prefixed message hash.
pub type TsHash = [u8; TS_HASH_LENGTH];

/// Hash canonical message data bytes.
pub fn message_hash(data: &[u8]) -> MessageHash {
    let digest = blake3::hash(data);
    let mut output = [0u8; HASH_LENGTH];
    output.copy_from_slice(&digest.as_bytes()[..HASH_LENGTH]);
    output
}

/// Derive the `tsHash` for a message from its timestamp and hash.
pub fn ts_hash(timestamp: u32, hash: &MessageHash) -> TsHash {
    let mut output = [0u8; TS_HASH_LENGTH];
    output[..4].copy_from_slice(&timestamp.to_be_bytes());
    output[4..].copy_from_slice(hash);
    output
}
