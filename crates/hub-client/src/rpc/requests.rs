//! Request shapes.
//!
//! Byte fields are already in binary form here; the facade converts and
//! validates hex arguments before one of these is built.

use hub_types::wire::RawCastId;
use hub_types::RawMessage;
use serde::{Deserialize, Serialize};

/// Request for anything keyed by a single fid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FidRequest {
    pub fid: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmpRequest {
    pub fid: u64,
    pub target_fid: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRequest {
    pub fid: u64,
    pub reaction_type: i32,
    pub cast_id: RawCastId,
}

/// `reaction_type` 0 matches any kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionsByFidRequest {
    pub fid: u64,
    pub reaction_type: i32,
}

/// `reaction_type` 0 matches any kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionsByCastRequest {
    pub cast_id: RawCastId,
    pub reaction_type: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub fid: u64,
    pub address: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerRequest {
    pub fid: u64,
    pub signer: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDataRequest {
    pub fid: u64,
    pub user_data_type: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRegistryEventRequest {
    pub fname: Vec<u8>,
}

/// Any unary request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HubRequest {
    Message(RawMessage),
    Fid(FidRequest),
    CastId(RawCastId),
    Amp(AmpRequest),
    Reaction(ReactionRequest),
    ReactionsByFid(ReactionsByFidRequest),
    ReactionsByCast(ReactionsByCastRequest),
    Verification(VerificationRequest),
    Signer(SignerRequest),
    UserData(UserDataRequest),
    NameRegistryEvent(NameRegistryEventRequest),
}

impl HubRequest {
    /// Shape name, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "Message",
            Self::Fid(_) => "FidRequest",
            Self::CastId(_) => "CastId",
            Self::Amp(_) => "AmpRequest",
            Self::Reaction(_) => "ReactionRequest",
            Self::ReactionsByFid(_) => "ReactionsByFidRequest",
            Self::ReactionsByCast(_) => "ReactionsByCastRequest",
            Self::Verification(_) => "VerificationRequest",
            Self::Signer(_) => "SignerRequest",
            Self::UserData(_) => "UserDataRequest",
            Self::NameRegistryEvent(_) => "NameRegistryEventRequest",
        }
    }

    pub fn fid(fid: u64) -> Self {
        Self::Fid(FidRequest { fid })
    }
}
