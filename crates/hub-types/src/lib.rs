//! # Hub Types
//!
//! Data model and Envelope Codec for the hub protocol client.
//!
//! ## Layers
//!
//! - **Wire** (`wire`): loosely-typed serde structs with raw discriminants and
//!   optional body slots, encoded with bincode.
//! - **Typed** (`message`, `registry`): immutable values whose body variant is
//!   the message type, byte fields carried as `0x` hex.
//! - **Codec** (`codec`): the only path between the two. Pure functions.
//!
//! Every fallible operation returns `HubResult<T>`.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![warn(clippy::all)]

pub mod builder;
pub mod codec;
pub mod errors;
pub mod hex_codec;
pub mod message;
pub mod registry;
pub mod time;
pub mod wire;

pub use builder::MessageBuilder;
pub use codec::{
    decode_id_registry_event, decode_message, decode_message_bytes, decode_name_registry_event,
    encode_id_registry_event, encode_message, encode_message_bytes, encode_name_registry_event,
};
pub use errors::{HubError, HubResult};
pub use hex_codec::{bytes_to_hex, hex_to_bytes};
pub use message::*;
pub use registry::{IdRegistryEvent, IdRegistryEventType, NameRegistryEvent, NameRegistryEventType};
pub use time::{from_farcaster_time, to_farcaster_time, FARCASTER_EPOCH};
pub use wire::{RawIdRegistryEvent, RawMessage, RawMessageData, RawNameRegistryEvent};
