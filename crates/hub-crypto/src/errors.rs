//! Signer key and signature errors.

use thiserror::Error;

/// Failure handling an app signer key or a signature.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// A key or signature slice had the wrong size.
    #[error("Invalid {what} length: expected {expected}, got {actual}")]
    InvalidLength {
        /// "public key" or "signature"
        what: &'static str,
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },

    /// The bytes are not a valid Ed25519 curve point.
    #[error("Public key is not a valid Ed25519 point")]
    InvalidPublicKey,

    /// The signature does not match the digest and key.
    #[error("Signature does not verify against signer")]
    BadSignature,
}
