//! # Hex Conversion
//!
//! Byte fields cross the typed API as `0x`-prefixed hex. Output is always
//! lowercase. Query arguments may use either case but must carry the
//! prefix; message fields being encoded must already be in the lowercase
//! form so that decoding them reproduces the same strings.
//!
//! The `serialize_*` helpers validate caller arguments before a request is
//! built, failing with `HubError::InvalidInput` so that no transport call is
//! made for a bad argument.

use crate::errors::{HubError, HubResult};
use crate::message::{
    CastId, ED25519_PUBLIC_KEY_LENGTH, ETH_ADDRESS_LENGTH, MAX_FNAME_LENGTH, TS_HASH_LENGTH,
};
use crate::wire::RawCastId;
use thiserror::Error;

/// Prefix carried by every hex string.
pub const HEX_PREFIX: &str = "0x";

/// Reasons a hex string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("missing 0x prefix")]
    MissingPrefix,

    #[error("odd number of hex digits")]
    OddLength,

    #[error("invalid hex character")]
    InvalidCharacter,

    #[error("expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("must be lowercase 0x hex")]
    NotCanonical,
}

/// Render bytes as lowercase `0x` hex.
#[must_use]
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("{HEX_PREFIX}{}", hex::encode(bytes))
}

/// Parse `0x` hex of any length.
pub fn hex_to_bytes(value: &str) -> Result<Vec<u8>, HexError> {
    let digits = value
        .strip_prefix(HEX_PREFIX)
        .or_else(|| value.strip_prefix("0X"))
        .ok_or(HexError::MissingPrefix)?;

    hex::decode(digits).map_err(|e| match e {
        hex::FromHexError::OddLength => HexError::OddLength,
        _ => HexError::InvalidCharacter,
    })
}

/// Parse `0x` hex that must decode to exactly `len` bytes.
pub fn hex_to_fixed(value: &str, len: usize) -> Result<Vec<u8>, HexError> {
    let bytes = hex_to_bytes(value)?;
    if bytes.len() != len {
        return Err(HexError::WrongLength {
            expected: len,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

/// Parse hex that must already be in the form `bytes_to_hex` produces and
/// decode to exactly `len` bytes.
pub fn canonical_hex_to_fixed(value: &str, len: usize) -> Result<Vec<u8>, HexError> {
    let digits = value
        .strip_prefix(HEX_PREFIX)
        .ok_or(HexError::NotCanonical)?;
    if digits.bytes().any(|b| b.is_ascii_uppercase()) {
        return Err(HexError::NotCanonical);
    }
    hex_to_fixed(value, len)
}

/// Returns true if `name` is a syntactically valid fname.
#[must_use]
pub fn is_valid_fname(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_FNAME_LENGTH || bytes[0] == b'-' {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
}

fn invalid(what: &str, err: HexError) -> HubError {
    HubError::invalid_input(format!("{what}: {err}"))
}

/// Validate and convert an Ethereum address argument.
pub fn serialize_eth_address(address: &str) -> HubResult<Vec<u8>> {
    hex_to_fixed(address, ETH_ADDRESS_LENGTH).map_err(|e| invalid("address", e))
}

/// Validate and convert an Ed25519 public key argument.
pub fn serialize_ed25519_public_key(key: &str) -> HubResult<Vec<u8>> {
    hex_to_fixed(key, ED25519_PUBLIC_KEY_LENGTH).map_err(|e| invalid("signer", e))
}

/// Validate and convert a `tsHash` argument.
pub fn serialize_ts_hash(ts_hash: &str) -> HubResult<Vec<u8>> {
    hex_to_fixed(ts_hash, TS_HASH_LENGTH).map_err(|e| invalid("tsHash", e))
}

/// Validate and convert an fname argument.
pub fn serialize_fname(fname: &str) -> HubResult<Vec<u8>> {
    if !is_valid_fname(fname) {
        return Err(HubError::invalid_input(format!("fname: {fname:?} is not a valid name")));
    }
    Ok(fname.as_bytes().to_vec())
}

/// Validate and convert a cast reference argument.
pub fn serialize_cast_id(cast_id: &CastId) -> HubResult<RawCastId> {
    if cast_id.fid == 0 {
        return Err(HubError::invalid_input("castId.fid: must be positive"));
    }
    Ok(RawCastId {
        fid: cast_id.fid,
        ts_hash: serialize_ts_hash(&cast_id.ts_hash)?,
    })
}
