//! # Envelope Codec
//!
//! Converts wire envelopes into typed messages and back.
//!
//! Decoding order:
//! 1. `data` must be present and its discriminant must be a known
//!    `MessageType`, else `UnknownMessageType`.
//! 2. Exactly the body slot selected by the discriminant must be populated and
//!    well-formed, else `MalformedBody { field }`.
//! 3. Remaining data fields and the envelope fields (hash, signature, signer,
//!    `tsHash`, schemes) must be present with the right length, else
//!    `MalformedEnvelope { field }`.
//!
//! Hash and signature are checked for shape only; verification happens on
//! the hub. Every function here is pure.

use crate::errors::{HubError, HubResult};
use crate::hex_codec::{bytes_to_hex, canonical_hex_to_fixed, is_valid_fname};
use crate::message::{
    AmpBody, CastAddBody, CastId, CastRemoveBody, FarcasterNetwork, HashScheme, Message,
    MessageBody, MessageData, MessageType, ReactionBody, ReactionType, SignatureScheme,
    SignerBody, UserDataBody, UserDataType, VerificationAddEthAddressBody,
    VerificationRemoveBody, BLOCK_HASH_LENGTH, ED25519_PUBLIC_KEY_LENGTH, ETH_ADDRESS_LENGTH,
    ETH_SIGNATURE_LENGTH, HASH_LENGTH, TS_HASH_LENGTH,
};
use crate::registry::{
    IdRegistryEvent, IdRegistryEventType, NameRegistryEvent, NameRegistryEventType,
};
use crate::wire::{
    RawAmpBody, RawCastAddBody, RawCastId, RawCastRemoveBody, RawIdRegistryEvent, RawMessage,
    RawMessageData, RawNameRegistryEvent, RawReactionBody, RawSignerBody, RawUserDataBody,
    RawVerificationAddEthAddressBody, RawVerificationRemoveBody,
};

// =============================================================================
// DECODE
// =============================================================================

/// Decode a wire envelope into a typed message.
pub fn decode_message(raw: &RawMessage) -> HubResult<Message> {
    let raw_data = raw
        .data
        .as_ref()
        .ok_or_else(|| HubError::malformed_envelope("data"))?;
    let data = decode_message_data(raw_data)?;

    let hash_scheme = HashScheme::try_from(raw.hash_scheme)
        .map_err(|_| HubError::malformed_envelope("hash_scheme"))?;
    let hash = fixed_hex(&raw.hash, HASH_LENGTH, || HubError::malformed_envelope("hash"))?;

    let signature_scheme = SignatureScheme::try_from(raw.signature_scheme)
        .map_err(|_| HubError::malformed_envelope("signature_scheme"))?;
    let signature = fixed_hex(&raw.signature, signature_scheme.signature_length(), || {
        HubError::malformed_envelope("signature")
    })?;
    let signer = fixed_hex(&raw.signer, signature_scheme.signer_length(), || {
        HubError::malformed_envelope("signer")
    })?;

    let ts_hash = fixed_hex(&raw.ts_hash, TS_HASH_LENGTH, || {
        HubError::malformed_envelope("ts_hash")
    })?;

    Ok(Message {
        data,
        hash,
        hash_scheme,
        signature,
        signature_scheme,
        signer,
        ts_hash,
    })
}

/// Decode envelope bytes into a typed message.
pub fn decode_message_bytes(bytes: &[u8]) -> HubResult<Message> {
    decode_message(&RawMessage::from_bytes(bytes)?)
}

/// Decode the signed data section.
pub fn decode_message_data(raw: &RawMessageData) -> HubResult<MessageData> {
    let message_type =
        MessageType::try_from(raw.message_type).map_err(HubError::UnknownMessageType)?;

    if raw.body_count() > 1 {
        return Err(HubError::malformed_body("body"));
    }
    let body = decode_body(message_type, raw)?;

    if raw.fid == 0 {
        return Err(HubError::malformed_envelope("data.fid"));
    }
    let network = FarcasterNetwork::try_from(raw.network)
        .map_err(|_| HubError::malformed_envelope("data.network"))?;

    Ok(MessageData {
        fid: raw.fid,
        timestamp: raw.timestamp,
        network,
        body,
    })
}

fn decode_body(message_type: MessageType, raw: &RawMessageData) -> HubResult<MessageBody> {
    let body = match message_type {
        MessageType::CastAdd => MessageBody::CastAdd(decode_cast_add(require(
            &raw.cast_add_body,
            "cast_add_body",
        )?)?),
        MessageType::CastRemove => MessageBody::CastRemove(decode_cast_remove(require(
            &raw.cast_remove_body,
            "cast_remove_body",
        )?)?),
        MessageType::ReactionAdd => MessageBody::ReactionAdd(decode_reaction(require(
            &raw.reaction_body,
            "reaction_body",
        )?)?),
        MessageType::ReactionRemove => MessageBody::ReactionRemove(decode_reaction(require(
            &raw.reaction_body,
            "reaction_body",
        )?)?),
        MessageType::AmpAdd => {
            MessageBody::AmpAdd(decode_amp(require(&raw.amp_body, "amp_body")?)?)
        }
        MessageType::AmpRemove => {
            MessageBody::AmpRemove(decode_amp(require(&raw.amp_body, "amp_body")?)?)
        }
        MessageType::VerificationAddEthAddress => {
            MessageBody::VerificationAddEthAddress(decode_verification_add(require(
                &raw.verification_add_eth_address_body,
                "verification_add_eth_address_body",
            )?)?)
        }
        MessageType::VerificationRemove => {
            MessageBody::VerificationRemove(decode_verification_remove(require(
                &raw.verification_remove_body,
                "verification_remove_body",
            )?)?)
        }
        MessageType::SignerAdd => {
            MessageBody::SignerAdd(decode_signer(require(&raw.signer_body, "signer_body")?)?)
        }
        MessageType::SignerRemove => {
            MessageBody::SignerRemove(decode_signer(require(&raw.signer_body, "signer_body")?)?)
        }
        MessageType::UserDataAdd => MessageBody::UserDataAdd(decode_user_data(require(
            &raw.user_data_body,
            "user_data_body",
        )?)?),
    };
    Ok(body)
}

fn require<'a, T>(slot: &'a Option<T>, field: &str) -> HubResult<&'a T> {
    slot.as_ref().ok_or_else(|| HubError::malformed_body(field))
}

fn fixed_hex(
    bytes: &[u8],
    len: usize,
    on_error: impl FnOnce() -> HubError,
) -> HubResult<String> {
    if bytes.len() != len {
        return Err(on_error());
    }
    Ok(bytes_to_hex(bytes))
}

fn body_hex(bytes: &[u8], len: usize, field: &str) -> HubResult<String> {
    fixed_hex(bytes, len, || HubError::malformed_body(field))
}

fn decode_cast_id(raw: &RawCastId, field: &str) -> HubResult<CastId> {
    if raw.fid == 0 {
        return Err(HubError::malformed_body(format!("{field}.fid")));
    }
    Ok(CastId {
        fid: raw.fid,
        ts_hash: body_hex(&raw.ts_hash, TS_HASH_LENGTH, &format!("{field}.ts_hash"))?,
    })
}

fn decode_cast_add(raw: &RawCastAddBody) -> HubResult<CastAddBody> {
    let text = raw
        .text
        .clone()
        .ok_or_else(|| HubError::malformed_body("cast_add_body.text"))?;

    if let Some(mentions) = &raw.mentions {
        if mentions.iter().any(|fid| *fid == 0) {
            return Err(HubError::malformed_body("cast_add_body.mentions"));
        }
    }

    let parent = raw
        .parent
        .as_ref()
        .map(|p| decode_cast_id(p, "cast_add_body.parent"))
        .transpose()?;

    Ok(CastAddBody {
        text,
        embeds: raw.embeds.clone(),
        mentions: raw.mentions.clone(),
        parent,
    })
}

fn decode_cast_remove(raw: &RawCastRemoveBody) -> HubResult<CastRemoveBody> {
    Ok(CastRemoveBody {
        target_ts_hash: body_hex(
            &raw.target_ts_hash,
            TS_HASH_LENGTH,
            "cast_remove_body.target_ts_hash",
        )?,
    })
}

fn decode_reaction(raw: &RawReactionBody) -> HubResult<ReactionBody> {
    let target = raw
        .target
        .as_ref()
        .ok_or_else(|| HubError::malformed_body("reaction_body.target"))?;
    let reaction_type = ReactionType::try_from(raw.reaction_type)
        .map_err(|_| HubError::malformed_body("reaction_body.reaction_type"))?;

    Ok(ReactionBody {
        target: decode_cast_id(target, "reaction_body.target")?,
        reaction_type,
    })
}

fn decode_amp(raw: &RawAmpBody) -> HubResult<AmpBody> {
    if raw.user == 0 {
        return Err(HubError::malformed_body("amp_body.user"));
    }
    Ok(AmpBody { user: raw.user })
}

fn decode_verification_add(
    raw: &RawVerificationAddEthAddressBody,
) -> HubResult<VerificationAddEthAddressBody> {
    Ok(VerificationAddEthAddressBody {
        address: body_hex(
            &raw.address,
            ETH_ADDRESS_LENGTH,
            "verification_add_eth_address_body.address",
        )?,
        eth_signature: body_hex(
            &raw.eth_signature,
            ETH_SIGNATURE_LENGTH,
            "verification_add_eth_address_body.eth_signature",
        )?,
        block_hash: body_hex(
            &raw.block_hash,
            BLOCK_HASH_LENGTH,
            "verification_add_eth_address_body.block_hash",
        )?,
    })
}

fn decode_verification_remove(raw: &RawVerificationRemoveBody) -> HubResult<VerificationRemoveBody> {
    Ok(VerificationRemoveBody {
        address: body_hex(
            &raw.address,
            ETH_ADDRESS_LENGTH,
            "verification_remove_body.address",
        )?,
    })
}

fn decode_signer(raw: &RawSignerBody) -> HubResult<SignerBody> {
    Ok(SignerBody {
        signer: body_hex(&raw.signer, ED25519_PUBLIC_KEY_LENGTH, "signer_body.signer")?,
    })
}

fn decode_user_data(raw: &RawUserDataBody) -> HubResult<UserDataBody> {
    let user_data_type = UserDataType::try_from(raw.user_data_type)
        .map_err(|_| HubError::malformed_body("user_data_body.user_data_type"))?;
    let value = raw
        .value
        .clone()
        .ok_or_else(|| HubError::malformed_body("user_data_body.value"))?;

    Ok(UserDataBody {
        user_data_type,
        value,
    })
}

// =============================================================================
// ENCODE
// =============================================================================

/// Encode a typed message into its wire envelope.
///
/// Fails with `InvalidInput` if a hex field of the typed value is not
/// lowercase `0x` hex of the expected length, or if an fid it carries is
/// zero.
pub fn encode_message(message: &Message) -> HubResult<RawMessage> {
    Ok(RawMessage {
        data: Some(encode_message_data(&message.data)?),
        hash: unhex(&message.hash, HASH_LENGTH, "hash")?,
        hash_scheme: message.hash_scheme.as_i32(),
        signature: unhex(
            &message.signature,
            message.signature_scheme.signature_length(),
            "signature",
        )?,
        signature_scheme: message.signature_scheme.as_i32(),
        signer: unhex(
            &message.signer,
            message.signature_scheme.signer_length(),
            "signer",
        )?,
        ts_hash: unhex(&message.ts_hash, TS_HASH_LENGTH, "ts_hash")?,
    })
}

/// Encode a typed message into envelope bytes.
pub fn encode_message_bytes(message: &Message) -> HubResult<Vec<u8>> {
    encode_message(message)?.to_bytes()
}

/// Encode the signed data section.
pub fn encode_message_data(data: &MessageData) -> HubResult<RawMessageData> {
    positive(data.fid, "fid")?;
    let mut raw = RawMessageData {
        message_type: data.message_type().as_i32(),
        fid: data.fid,
        timestamp: data.timestamp,
        network: data.network.as_i32(),
        ..Default::default()
    };

    match &data.body {
        MessageBody::CastAdd(body) => raw.cast_add_body = Some(encode_cast_add(body)?),
        MessageBody::CastRemove(body) => {
            raw.cast_remove_body = Some(RawCastRemoveBody {
                target_ts_hash: unhex(&body.target_ts_hash, TS_HASH_LENGTH, "target_ts_hash")?,
            });
        }
        MessageBody::ReactionAdd(body) | MessageBody::ReactionRemove(body) => {
            raw.reaction_body = Some(RawReactionBody {
                target: Some(encode_cast_id(&body.target)?),
                reaction_type: body.reaction_type.as_i32(),
            });
        }
        MessageBody::AmpAdd(body) | MessageBody::AmpRemove(body) => {
            positive(body.user, "amp_body.user")?;
            raw.amp_body = Some(RawAmpBody { user: body.user });
        }
        MessageBody::VerificationAddEthAddress(body) => {
            raw.verification_add_eth_address_body = Some(RawVerificationAddEthAddressBody {
                address: unhex(&body.address, ETH_ADDRESS_LENGTH, "address")?,
                eth_signature: unhex(&body.eth_signature, ETH_SIGNATURE_LENGTH, "eth_signature")?,
                block_hash: unhex(&body.block_hash, BLOCK_HASH_LENGTH, "block_hash")?,
            });
        }
        MessageBody::VerificationRemove(body) => {
            raw.verification_remove_body = Some(RawVerificationRemoveBody {
                address: unhex(&body.address, ETH_ADDRESS_LENGTH, "address")?,
            });
        }
        MessageBody::SignerAdd(body) | MessageBody::SignerRemove(body) => {
            raw.signer_body = Some(RawSignerBody {
                signer: unhex(&body.signer, ED25519_PUBLIC_KEY_LENGTH, "signer_body.signer")?,
            });
        }
        MessageBody::UserDataAdd(body) => {
            raw.user_data_body = Some(RawUserDataBody {
                user_data_type: body.user_data_type.as_i32(),
                value: Some(body.value.clone()),
            });
        }
    }

    Ok(raw)
}

fn unhex(value: &str, len: usize, field: &str) -> HubResult<Vec<u8>> {
    canonical_hex_to_fixed(value, len)
        .map_err(|e| HubError::invalid_input(format!("{field}: {e}")))
}

fn positive(fid: u64, field: &str) -> HubResult<()> {
    if fid == 0 {
        return Err(HubError::invalid_input(format!("{field}: must be positive")));
    }
    Ok(())
}

fn encode_cast_id(cast_id: &CastId) -> HubResult<RawCastId> {
    positive(cast_id.fid, "cast_id.fid")?;
    Ok(RawCastId {
        fid: cast_id.fid,
        ts_hash: unhex(&cast_id.ts_hash, TS_HASH_LENGTH, "ts_hash")?,
    })
}

fn encode_cast_add(body: &CastAddBody) -> HubResult<RawCastAddBody> {
    for mention in body.mentions.iter().flatten() {
        positive(*mention, "mentions")?;
    }
    Ok(RawCastAddBody {
        text: Some(body.text.clone()),
        embeds: body.embeds.clone(),
        mentions: body.mentions.clone(),
        parent: body.parent.as_ref().map(encode_cast_id).transpose()?,
    })
}

// =============================================================================
// REGISTRY EVENTS
// =============================================================================

fn optional_address(bytes: &[u8], field: &str) -> HubResult<Option<String>> {
    if bytes.is_empty() {
        return Ok(None);
    }
    fixed_hex(bytes, ETH_ADDRESS_LENGTH, || HubError::malformed_envelope(field)).map(Some)
}

/// Decode a wire id registry event.
pub fn decode_id_registry_event(raw: &RawIdRegistryEvent) -> HubResult<IdRegistryEvent> {
    let env = |field: &str| HubError::malformed_envelope(field);

    if raw.fid == 0 {
        return Err(env("id_registry_event.fid"));
    }
    let event_type = IdRegistryEventType::try_from(raw.event_type)
        .map_err(|_| env("id_registry_event.event_type"))?;

    Ok(IdRegistryEvent {
        block_number: raw.block_number,
        block_hash: fixed_hex(&raw.block_hash, BLOCK_HASH_LENGTH, || {
            env("id_registry_event.block_hash")
        })?,
        transaction_hash: fixed_hex(&raw.transaction_hash, BLOCK_HASH_LENGTH, || {
            env("id_registry_event.transaction_hash")
        })?,
        log_index: raw.log_index,
        fid: raw.fid,
        to: fixed_hex(&raw.to, ETH_ADDRESS_LENGTH, || env("id_registry_event.to"))?,
        event_type,
        from: optional_address(&raw.from, "id_registry_event.from")?,
    })
}

/// Decode a wire name registry event.
pub fn decode_name_registry_event(raw: &RawNameRegistryEvent) -> HubResult<NameRegistryEvent> {
    let env = |field: &str| HubError::malformed_envelope(field);

    let fname = String::from_utf8(raw.fname.clone())
        .ok()
        .filter(|name| is_valid_fname(name))
        .ok_or_else(|| env("name_registry_event.fname"))?;
    let event_type = NameRegistryEventType::try_from(raw.event_type)
        .map_err(|_| env("name_registry_event.event_type"))?;

    Ok(NameRegistryEvent {
        block_number: raw.block_number,
        block_hash: fixed_hex(&raw.block_hash, BLOCK_HASH_LENGTH, || {
            env("name_registry_event.block_hash")
        })?,
        transaction_hash: fixed_hex(&raw.transaction_hash, BLOCK_HASH_LENGTH, || {
            env("name_registry_event.transaction_hash")
        })?,
        log_index: raw.log_index,
        fname,
        from: optional_address(&raw.from, "name_registry_event.from")?,
        to: fixed_hex(&raw.to, ETH_ADDRESS_LENGTH, || env("name_registry_event.to"))?,
        event_type,
        expiry: raw.expiry,
    })
}

/// Encode a typed id registry event.
pub fn encode_id_registry_event(event: &IdRegistryEvent) -> HubResult<RawIdRegistryEvent> {
    positive(event.fid, "fid")?;
    Ok(RawIdRegistryEvent {
        block_number: event.block_number,
        block_hash: unhex(&event.block_hash, BLOCK_HASH_LENGTH, "block_hash")?,
        transaction_hash: unhex(&event.transaction_hash, BLOCK_HASH_LENGTH, "transaction_hash")?,
        log_index: event.log_index,
        fid: event.fid,
        to: unhex(&event.to, ETH_ADDRESS_LENGTH, "to")?,
        event_type: event.event_type.as_i32(),
        from: event
            .from
            .as_deref()
            .map(|from| unhex(from, ETH_ADDRESS_LENGTH, "from"))
            .transpose()?
            .unwrap_or_default(),
    })
}

/// Encode a typed name registry event.
pub fn encode_name_registry_event(event: &NameRegistryEvent) -> HubResult<RawNameRegistryEvent> {
    Ok(RawNameRegistryEvent {
        block_number: event.block_number,
        block_hash: unhex(&event.block_hash, BLOCK_HASH_LENGTH, "block_hash")?,
        transaction_hash: unhex(&event.transaction_hash, BLOCK_HASH_LENGTH, "transaction_hash")?,
        log_index: event.log_index,
        fname: event.fname.as_bytes().to_vec(),
        from: event
            .from
            .as_deref()
            .map(|from| unhex(from, ETH_ADDRESS_LENGTH, "from"))
            .transpose()?
            .unwrap_or_default(),
        to: unhex(&event.to, ETH_ADDRESS_LENGTH, "to")?,
        event_type: event.event_type.as_i32(),
        expiry: event.expiry,
    })
}
