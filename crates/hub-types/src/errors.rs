//! # Error Types
//!
//! One taxonomy for every fallible operation in the client layer. Decoding,
//! input validation and transport faults all surface through `HubError`, so
//! callers branch on a single `Result` rather than several error families.

use thiserror::Error;

/// Result alias used across the hub crates.
pub type HubResult<T> = Result<T, HubError>;

/// Errors produced by the codec, the client facade and the subscription path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// The envelope's discriminant is not a known message type.
    #[error("Unknown message type: {0}")]
    UnknownMessageType(i32),

    /// A body field required by the message type is absent or ill-shaped.
    #[error("Malformed body: {field}")]
    MalformedBody { field: String },

    /// An envelope-level field is absent or ill-shaped.
    #[error("Malformed envelope: {field}")]
    MalformedEnvelope { field: String },

    /// A caller-supplied argument failed validation before dispatch.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Connection, timeout or protocol failure in the transport.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// The hub has no entity matching the request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The hub or subscription is temporarily unable to serve.
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl HubError {
    /// Body field error.
    pub fn malformed_body(field: impl Into<String>) -> Self {
        Self::MalformedBody {
            field: field.into(),
        }
    }

    /// Envelope field error.
    pub fn malformed_envelope(field: impl Into<String>) -> Self {
        Self::MalformedEnvelope {
            field: field.into(),
        }
    }

    /// Caller argument error.
    pub fn invalid_input(details: impl Into<String>) -> Self {
        Self::InvalidInput(details.into())
    }

    /// Transport error.
    pub fn transport(details: impl Into<String>) -> Self {
        Self::TransportFailure(details.into())
    }

    /// Returns true for errors raised while decoding a wire value.
    #[must_use]
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownMessageType(_) | Self::MalformedBody { .. } | Self::MalformedEnvelope { .. }
        )
    }

    /// Returns true when repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransportFailure(_) | Self::Unavailable(_))
    }

    /// Stable machine-readable code for the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownMessageType(_) => "unknown_message_type",
            Self::MalformedBody { .. } => "malformed_body",
            Self::MalformedEnvelope { .. } => "malformed_envelope",
            Self::InvalidInput(_) => "invalid_input",
            Self::TransportFailure(_) => "transport_failure",
            Self::NotFound(_) => "not_found",
            Self::Unavailable(_) => "unavailable",
        }
    }
}
