//! # Registry Events
//!
//! On-chain registry changes relayed by the hub: custody of an fid
//! (`IdRegistryEvent`) and ownership of an fname (`NameRegistryEvent`).
//! The client passes these through with byte fields rendered as hex and does
//! not interpret them further.

use crate::message::Fid;

crate::wire_enum! {
    /// Kind of id registry change.
    IdRegistryEventType {
        Register = 1,
        Transfer = 2,
    }
}

crate::wire_enum! {
    /// Kind of name registry change.
    NameRegistryEventType {
        Transfer = 1,
        Renew = 2,
    }
}

/// Custody change for an fid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdRegistryEvent {
    pub block_number: u64,
    pub block_hash: String,
    pub transaction_hash: String,
    pub log_index: u32,
    pub fid: Fid,
    /// New custody address.
    pub to: String,
    pub event_type: IdRegistryEventType,
    /// Previous custody address; absent on registration.
    pub from: Option<String>,
}

/// Ownership change for an fname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRegistryEvent {
    pub block_number: u64,
    pub block_hash: String,
    pub transaction_hash: String,
    pub log_index: u32,
    pub fname: String,
    /// Previous owner; absent when the name is first minted.
    pub from: Option<String>,
    pub to: String,
    pub event_type: NameRegistryEventType,
    /// Expiry as a Unix timestamp in seconds.
    pub expiry: u64,
}
