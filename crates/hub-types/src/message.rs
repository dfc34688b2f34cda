//! # Message Model
//!
//! Typed, immutable view of a hub message. Byte fields are carried as
//! `0x`-prefixed lowercase hex strings; the body is a sum type whose variant
//! *is* the message type, so a typed message can never disagree with its own
//! discriminant.
//!
//! ## Clusters
//!
//! - **Envelope**: `Message` (hash, signature, signer, `tsHash`, schemes)
//! - **Data**: `MessageData` (fid, timestamp, network, body)
//! - **Bodies**: one struct per message family
//! - **References**: `CastId` / `TargetId`

/// Account identifier on the network.
pub type Fid = u64;

/// Length of a message hash in bytes.
pub const HASH_LENGTH: usize = hub_crypto::HASH_LENGTH;
/// Length of a `tsHash` in bytes.
pub const TS_HASH_LENGTH: usize = hub_crypto::TS_HASH_LENGTH;
/// Length of an Ed25519 signature in bytes.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;
/// Length of an EIP-712 signature in bytes.
pub const EIP712_SIGNATURE_LENGTH: usize = 65;
/// Length of an Ed25519 public key in bytes.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
/// Length of an Ethereum address in bytes.
pub const ETH_ADDRESS_LENGTH: usize = 20;
/// Length of an Ethereum ECDSA signature in bytes.
pub const ETH_SIGNATURE_LENGTH: usize = 65;
/// Length of an Ethereum block or transaction hash in bytes.
pub const BLOCK_HASH_LENGTH: usize = 32;
/// Maximum length of an fname in bytes.
pub const MAX_FNAME_LENGTH: usize = 16;

/// Declares a fieldless enum with explicit wire discriminants, plus the
/// `TryFrom<i32>` conversion that rejects unknown values.
#[macro_export]
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $value:expr),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant = $value),+
        }

        impl $name {
            /// Every variant, in discriminant order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire discriminant.
            #[must_use]
            pub fn as_i32(self) -> i32 {
                self as i32
            }

            /// Variant name.
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = i32;

            fn try_from(value: i32) -> Result<Self, i32> {
                match value {
                    $(v if v == $value => Ok($name::$variant),)+
                    other => Err(other),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value as i32
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

wire_enum! {
    /// Discriminant selecting the body schema of a message.
    MessageType {
        CastAdd = 1,
        CastRemove = 2,
        ReactionAdd = 3,
        ReactionRemove = 4,
        AmpAdd = 5,
        AmpRemove = 6,
        VerificationAddEthAddress = 7,
        VerificationRemove = 8,
        SignerAdd = 9,
        SignerRemove = 10,
        UserDataAdd = 11,
    }
}

wire_enum! {
    /// Hash function used for `Message::hash`.
    HashScheme {
        Blake3 = 1,
    }
}

wire_enum! {
    /// Signature algorithm used for `Message::signature`.
    SignatureScheme {
        /// App signer key.
        Ed25519 = 1,
        /// Custody address (typed-data signature).
        Eip712 = 2,
    }
}

wire_enum! {
    /// Network instance a message belongs to.
    FarcasterNetwork {
        Mainnet = 1,
        Testnet = 2,
        Devnet = 3,
    }
}

wire_enum! {
    /// Kind of reaction.
    ReactionType {
        Like = 1,
        Recast = 2,
    }
}

wire_enum! {
    /// Kind of user profile data.
    UserDataType {
        Pfp = 1,
        Display = 2,
        Bio = 3,
        Location = 4,
        Url = 5,
        Fname = 6,
    }
}

impl SignatureScheme {
    /// Expected signature length for this scheme.
    #[must_use]
    pub fn signature_length(self) -> usize {
        match self {
            Self::Ed25519 => ED25519_SIGNATURE_LENGTH,
            Self::Eip712 => EIP712_SIGNATURE_LENGTH,
        }
    }

    /// Expected signer length for this scheme.
    #[must_use]
    pub fn signer_length(self) -> usize {
        match self {
            Self::Ed25519 => ED25519_PUBLIC_KEY_LENGTH,
            Self::Eip712 => ETH_ADDRESS_LENGTH,
        }
    }
}

/// Stable reference to another message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CastId {
    /// Author of the referenced message.
    pub fid: Fid,
    /// `tsHash` of the referenced message (hex).
    pub ts_hash: String,
}

/// Reference target of reactions and cast replies.
pub type TargetId = CastId;

/// Body of a `CastAdd` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastAddBody {
    pub text: String,
    pub embeds: Option<Vec<String>>,
    pub mentions: Option<Vec<Fid>>,
    pub parent: Option<TargetId>,
}

/// Body of a `CastRemove` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastRemoveBody {
    pub target_ts_hash: String,
}

/// Body of `ReactionAdd` / `ReactionRemove` messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionBody {
    pub target: TargetId,
    pub reaction_type: ReactionType,
}

/// Body of `AmpAdd` / `AmpRemove` messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmpBody {
    pub user: Fid,
}

/// Body of a `VerificationAddEthAddress` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationAddEthAddressBody {
    pub address: String,
    pub eth_signature: String,
    pub block_hash: String,
}

/// Body of a `VerificationRemove` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRemoveBody {
    pub address: String,
}

/// Body of `SignerAdd` / `SignerRemove` messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerBody {
    pub signer: String,
}

/// Body of a `UserDataAdd` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDataBody {
    pub user_data_type: UserDataType,
    pub value: String,
}

/// Message body, one arm per `MessageType`.
///
/// Add/remove pairs that share a body schema are still separate arms: the
/// arm is the message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    CastAdd(CastAddBody),
    CastRemove(CastRemoveBody),
    ReactionAdd(ReactionBody),
    ReactionRemove(ReactionBody),
    AmpAdd(AmpBody),
    AmpRemove(AmpBody),
    VerificationAddEthAddress(VerificationAddEthAddressBody),
    VerificationRemove(VerificationRemoveBody),
    SignerAdd(SignerBody),
    SignerRemove(SignerBody),
    UserDataAdd(UserDataBody),
}

impl MessageBody {
    /// Message type selected by this body.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::CastAdd(_) => MessageType::CastAdd,
            Self::CastRemove(_) => MessageType::CastRemove,
            Self::ReactionAdd(_) => MessageType::ReactionAdd,
            Self::ReactionRemove(_) => MessageType::ReactionRemove,
            Self::AmpAdd(_) => MessageType::AmpAdd,
            Self::AmpRemove(_) => MessageType::AmpRemove,
            Self::VerificationAddEthAddress(_) => MessageType::VerificationAddEthAddress,
            Self::VerificationRemove(_) => MessageType::VerificationRemove,
            Self::SignerAdd(_) => MessageType::SignerAdd,
            Self::SignerRemove(_) => MessageType::SignerRemove,
            Self::UserDataAdd(_) => MessageType::UserDataAdd,
        }
    }
}

/// Signed content of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageData {
    pub fid: Fid,
    /// Seconds since the network epoch.
    pub timestamp: u32,
    pub network: FarcasterNetwork,
    pub body: MessageBody,
}

impl MessageData {
    /// Discriminant of this message.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        self.body.message_type()
    }
}

/// A decoded hub message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub data: MessageData,
    pub hash: String,
    pub hash_scheme: HashScheme,
    pub signature: String,
    pub signature_scheme: SignatureScheme,
    pub signer: String,
    pub ts_hash: String,
}

impl Message {
    /// Discriminant of this message.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        self.data.message_type()
    }

    /// Author of this message.
    #[must_use]
    pub fn fid(&self) -> Fid {
        self.data.fid
    }

    /// Reference to this message, usable as a reply parent or reaction target.
    #[must_use]
    pub fn cast_id(&self) -> CastId {
        CastId {
            fid: self.data.fid,
            ts_hash: self.ts_hash.clone(),
        }
    }
}
