//! In-memory message store backing `LocalHub`.
//!
//! Keeps merged messages in merge order and the latest registry event per
//! fid / fname. Add and remove messages are stored side by side; there is
//! no conflict resolution.

use hub_types::{
    CastId, Fid, IdRegistryEvent, Message, MessageBody, MessageType, NameRegistryEvent,
    ReactionBody, ReactionType, UserDataType,
};
use std::collections::{HashMap, HashSet};

/// Message families used by the bulk by-fid queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFamily {
    Cast,
    Amp,
    Reaction,
    Verification,
    Signer,
    UserData,
}

impl MessageFamily {
    pub fn contains(self, message_type: MessageType) -> bool {
        use MessageType::*;
        match self {
            Self::Cast => matches!(message_type, CastAdd | CastRemove),
            Self::Amp => matches!(message_type, AmpAdd | AmpRemove),
            Self::Reaction => matches!(message_type, ReactionAdd | ReactionRemove),
            Self::Verification => {
                matches!(message_type, VerificationAddEthAddress | VerificationRemove)
            }
            Self::Signer => matches!(message_type, SignerAdd | SignerRemove),
            Self::UserData => matches!(message_type, UserDataAdd),
        }
    }
}

#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Vec<Message>,
    hashes: HashSet<String>,
    id_registry: HashMap<Fid, IdRegistryEvent>,
    name_registry: HashMap<String, NameRegistryEvent>,
}

fn reaction_matches(body: &ReactionBody, reaction_type: Option<ReactionType>) -> bool {
    reaction_type.map_or(true, |t| body.reaction_type == t)
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a message. Returns false if one with the same hash exists.
    pub fn insert(&mut self, message: Message) -> bool {
        if !self.hashes.insert(message.hash.clone()) {
            return false;
        }
        self.messages.push(message);
        true
    }

    /// Remove a message by hash.
    pub fn remove(&mut self, hash: &str) -> Option<Message> {
        if !self.hashes.remove(hash) {
            return None;
        }
        let index = self.messages.iter().position(|m| m.hash == hash)?;
        Some(self.messages.remove(index))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Store an id registry event. Returns false if it is already the
    /// latest event for its fid.
    pub fn put_id_registry_event(&mut self, event: IdRegistryEvent) -> bool {
        if self.id_registry.get(&event.fid) == Some(&event) {
            return false;
        }
        self.id_registry.insert(event.fid, event);
        true
    }

    /// Store a name registry event. Returns false if it is already the
    /// latest event for its fname.
    pub fn put_name_registry_event(&mut self, event: NameRegistryEvent) -> bool {
        if self.name_registry.get(&event.fname) == Some(&event) {
            return false;
        }
        self.name_registry.insert(event.fname.clone(), event);
        true
    }

    pub fn id_registry_event(&self, fid: Fid) -> Option<&IdRegistryEvent> {
        self.id_registry.get(&fid)
    }

    pub fn name_registry_event(&self, fname: &str) -> Option<&NameRegistryEvent> {
        self.name_registry.get(fname)
    }

    fn select<'a>(
        &'a self,
        predicate: impl Fn(&Message) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Message> + 'a {
        self.messages.iter().filter(move |m| predicate(m))
    }

    fn by_fid(&self, fid: Fid) -> impl Iterator<Item = &Message> + '_ {
        self.select(move |m| m.fid() == fid)
    }

    // -------------------------------------------------------------------------
    // Casts
    // -------------------------------------------------------------------------

    pub fn cast(&self, fid: Fid, ts_hash: &str) -> Option<&Message> {
        self.by_fid(fid).find(|m| {
            m.message_type() == MessageType::CastAdd && m.ts_hash.eq_ignore_ascii_case(ts_hash)
        })
    }

    pub fn casts_by_fid(&self, fid: Fid) -> Vec<Message> {
        self.by_fid(fid)
            .filter(|m| m.message_type() == MessageType::CastAdd)
            .cloned()
            .collect()
    }

    pub fn casts_by_parent(&self, parent: &CastId) -> Vec<Message> {
        self.select(|m| match &m.data.body {
            MessageBody::CastAdd(body) => body.parent.as_ref() == Some(parent),
            _ => false,
        })
        .cloned()
        .collect()
    }

    pub fn casts_by_mention(&self, fid: Fid) -> Vec<Message> {
        self.select(move |m| match &m.data.body {
            MessageBody::CastAdd(body) => body
                .mentions
                .as_ref()
                .is_some_and(|mentions| mentions.contains(&fid)),
            _ => false,
        })
        .cloned()
        .collect()
    }

    // -------------------------------------------------------------------------
    // Amps
    // -------------------------------------------------------------------------

    pub fn amp(&self, fid: Fid, target_fid: Fid) -> Option<&Message> {
        self.by_fid(fid).find(|m| match &m.data.body {
            MessageBody::AmpAdd(body) => body.user == target_fid,
            _ => false,
        })
    }

    pub fn amps_by_fid(&self, fid: Fid) -> Vec<Message> {
        self.by_fid(fid)
            .filter(|m| m.message_type() == MessageType::AmpAdd)
            .cloned()
            .collect()
    }

    pub fn amps_by_user(&self, user: Fid) -> Vec<Message> {
        self.select(move |m| match &m.data.body {
            MessageBody::AmpAdd(body) => body.user == user,
            _ => false,
        })
        .cloned()
        .collect()
    }

    // -------------------------------------------------------------------------
    // Reactions
    // -------------------------------------------------------------------------

    pub fn reaction(
        &self,
        fid: Fid,
        reaction_type: ReactionType,
        target: &CastId,
    ) -> Option<&Message> {
        self.by_fid(fid).find(|m| match &m.data.body {
            MessageBody::ReactionAdd(body) => {
                body.reaction_type == reaction_type && &body.target == target
            }
            _ => false,
        })
    }

    pub fn reactions_by_fid(&self, fid: Fid, reaction_type: Option<ReactionType>) -> Vec<Message> {
        self.by_fid(fid)
            .filter(|m| match &m.data.body {
                MessageBody::ReactionAdd(body) => reaction_matches(body, reaction_type),
                _ => false,
            })
            .cloned()
            .collect()
    }

    pub fn reactions_by_cast(
        &self,
        target: &CastId,
        reaction_type: Option<ReactionType>,
    ) -> Vec<Message> {
        self.select(|m| match &m.data.body {
            MessageBody::ReactionAdd(body) => {
                &body.target == target && reaction_matches(body, reaction_type)
            }
            _ => false,
        })
        .cloned()
        .collect()
    }

    // -------------------------------------------------------------------------
    // Verifications, signers, user data
    // -------------------------------------------------------------------------

    pub fn verification(&self, fid: Fid, address: &str) -> Option<&Message> {
        self.by_fid(fid).find(|m| match &m.data.body {
            MessageBody::VerificationAddEthAddress(body) => {
                body.address.eq_ignore_ascii_case(address)
            }
            _ => false,
        })
    }

    pub fn verifications_by_fid(&self, fid: Fid) -> Vec<Message> {
        self.by_fid(fid)
            .filter(|m| m.message_type() == MessageType::VerificationAddEthAddress)
            .cloned()
            .collect()
    }

    pub fn signer(&self, fid: Fid, signer: &str) -> Option<&Message> {
        self.by_fid(fid).find(|m| match &m.data.body {
            MessageBody::SignerAdd(body) => body.signer.eq_ignore_ascii_case(signer),
            _ => false,
        })
    }

    pub fn signers_by_fid(&self, fid: Fid) -> Vec<Message> {
        self.by_fid(fid)
            .filter(|m| m.message_type() == MessageType::SignerAdd)
            .cloned()
            .collect()
    }

    pub fn user_data(&self, fid: Fid, user_data_type: UserDataType) -> Option<&Message> {
        // latest value wins
        self.by_fid(fid)
            .filter(|m| match &m.data.body {
                MessageBody::UserDataAdd(body) => body.user_data_type == user_data_type,
                _ => false,
            })
            .last()
    }

    pub fn user_data_by_fid(&self, fid: Fid) -> Vec<Message> {
        self.by_fid(fid)
            .filter(|m| m.message_type() == MessageType::UserDataAdd)
            .cloned()
            .collect()
    }

    /// Every message of `family` authored by `fid`, adds and removes.
    pub fn all_by_fid(&self, fid: Fid, family: MessageFamily) -> Vec<Message> {
        self.by_fid(fid)
            .filter(|m| family.contains(m.message_type()))
            .cloned()
            .collect()
    }
}
