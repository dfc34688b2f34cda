//! # Hub Crypto
//!
//! Primitives needed to construct validly-signed hub messages.
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | BLAKE3 (160-bit truncation) | Message content digests, `tsHash` keys |
//! | `signatures` | Ed25519 | Signing message digests with an app signer key |
//!
//! Signature *verification* of received messages happens on the hub; the
//! client only needs to produce signatures for messages it submits.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod signatures;

pub use errors::CryptoError;
pub use hashing::{message_hash, ts_hash, MessageHash, TsHash, HASH_LENGTH, TS_HASH_LENGTH};
pub use signatures::{Ed25519KeyPair, Ed25519PublicKey, Ed25519Signature};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
