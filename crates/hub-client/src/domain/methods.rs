//! Hub RPC method names.

use std::fmt;

/// A unary hub RPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HubMethod {
    SubmitMessage,
    GetCast,
    GetCastsByFid,
    GetCastsByParent,
    GetCastsByMention,
    GetAmp,
    GetAmpsByFid,
    GetAmpsByUser,
    GetReaction,
    GetReactionsByFid,
    GetReactionsByCast,
    GetVerification,
    GetVerificationsByFid,
    GetSigner,
    GetSignersByFid,
    GetIdRegistryEvent,
    GetUserData,
    GetUserDataByFid,
    GetNameRegistryEvent,
    GetAllCastMessagesByFid,
    GetAllAmpMessagesByFid,
    GetAllReactionMessagesByFid,
    GetAllVerificationMessagesByFid,
    GetAllSignerMessagesByFid,
    GetAllUserDataMessagesByFid,
}

impl HubMethod {
    /// Wire name of the method.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SubmitMessage => "submitMessage",
            Self::GetCast => "getCast",
            Self::GetCastsByFid => "getCastsByFid",
            Self::GetCastsByParent => "getCastsByParent",
            Self::GetCastsByMention => "getCastsByMention",
            Self::GetAmp => "getAmp",
            Self::GetAmpsByFid => "getAmpsByFid",
            Self::GetAmpsByUser => "getAmpsByUser",
            Self::GetReaction => "getReaction",
            Self::GetReactionsByFid => "getReactionsByFid",
            Self::GetReactionsByCast => "getReactionsByCast",
            Self::GetVerification => "getVerification",
            Self::GetVerificationsByFid => "getVerificationsByFid",
            Self::GetSigner => "getSigner",
            Self::GetSignersByFid => "getSignersByFid",
            Self::GetIdRegistryEvent => "getIdRegistryEvent",
            Self::GetUserData => "getUserData",
            Self::GetUserDataByFid => "getUserDataByFid",
            Self::GetNameRegistryEvent => "getNameRegistryEvent",
            Self::GetAllCastMessagesByFid => "getAllCastMessagesByFid",
            Self::GetAllAmpMessagesByFid => "getAllAmpMessagesByFid",
            Self::GetAllReactionMessagesByFid => "getAllReactionMessagesByFid",
            Self::GetAllVerificationMessagesByFid => "getAllVerificationMessagesByFid",
            Self::GetAllSignerMessagesByFid => "getAllSignerMessagesByFid",
            Self::GetAllUserDataMessagesByFid => "getAllUserDataMessagesByFid",
        }
    }
}

impl fmt::Display for HubMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
