//! # Hub Events
//!
//! State-change events emitted by the hub after a merge, prune or revoke,
//! and the filter that decides which of them a subscriber receives.

use hub_types::codec::{
    decode_id_registry_event, decode_message, decode_name_registry_event,
    encode_id_registry_event, encode_message, encode_name_registry_event,
};
use hub_types::wire::{decode_wire, encode_wire};
use hub_types::{
    HubError, HubResult, IdRegistryEvent, Message, NameRegistryEvent, RawIdRegistryEvent,
    RawMessage, RawNameRegistryEvent,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

hub_types::wire_enum! {
    /// Kind of hub event, used for filtering.
    EventType {
        MergeMessage = 1,
        PruneMessage = 2,
        RevokeMessage = 3,
        MergeIdRegistryEvent = 4,
        MergeNameRegistryEvent = 5,
    }
}

/// An event produced by the hub, carrying exactly one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// A message became part of canonical state.
    MergeMessage(Message),

    /// A message was removed to stay within storage limits.
    PruneMessage(Message),

    /// A message was removed because its signer was revoked.
    RevokeMessage(Message),

    MergeIdRegistryEvent(IdRegistryEvent),

    MergeNameRegistryEvent(NameRegistryEvent),
}

impl HubEvent {
    /// Get the event type for filtering.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match self {
            Self::MergeMessage(_) => EventType::MergeMessage,
            Self::PruneMessage(_) => EventType::PruneMessage,
            Self::RevokeMessage(_) => EventType::RevokeMessage,
            Self::MergeIdRegistryEvent(_) => EventType::MergeIdRegistryEvent,
            Self::MergeNameRegistryEvent(_) => EventType::MergeNameRegistryEvent,
        }
    }

    /// Message payload, if this is a message event.
    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::MergeMessage(m) | Self::PruneMessage(m) | Self::RevokeMessage(m) => Some(m),
            _ => None,
        }
    }

    /// Encode into the wire form.
    pub fn to_raw(&self) -> HubResult<RawEventResponse> {
        let mut raw = RawEventResponse {
            event_type: self.event_type().as_i32(),
            ..Default::default()
        };
        match self {
            Self::MergeMessage(m) | Self::PruneMessage(m) | Self::RevokeMessage(m) => {
                raw.message = Some(encode_message(m)?);
            }
            Self::MergeIdRegistryEvent(e) => {
                raw.id_registry_event = Some(encode_id_registry_event(e)?);
            }
            Self::MergeNameRegistryEvent(e) => {
                raw.name_registry_event = Some(encode_name_registry_event(e)?);
            }
        }
        Ok(raw)
    }

    /// Decode from the wire form. The payload must match the tag.
    pub fn from_raw(raw: &RawEventResponse) -> HubResult<Self> {
        let event_type = EventType::try_from(raw.event_type)
            .map_err(|_| HubError::malformed_envelope("event.type"))?;

        if raw.payload_count() != 1 {
            return Err(HubError::malformed_envelope("event.payload"));
        }

        let message = || {
            raw.message
                .as_ref()
                .ok_or_else(|| HubError::malformed_envelope("event.message"))
                .and_then(decode_message)
        };

        let event = match event_type {
            EventType::MergeMessage => Self::MergeMessage(message()?),
            EventType::PruneMessage => Self::PruneMessage(message()?),
            EventType::RevokeMessage => Self::RevokeMessage(message()?),
            EventType::MergeIdRegistryEvent => Self::MergeIdRegistryEvent(
                raw.id_registry_event
                    .as_ref()
                    .ok_or_else(|| HubError::malformed_envelope("event.id_registry_event"))
                    .and_then(decode_id_registry_event)?,
            ),
            EventType::MergeNameRegistryEvent => Self::MergeNameRegistryEvent(
                raw.name_registry_event
                    .as_ref()
                    .ok_or_else(|| HubError::malformed_envelope("event.name_registry_event"))
                    .and_then(decode_name_registry_event)?,
            ),
        };
        Ok(event)
    }
}

/// Wire form of an event as pushed on a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEventResponse {
    pub event_type: i32,
    pub message: Option<RawMessage>,
    pub id_registry_event: Option<RawIdRegistryEvent>,
    pub name_registry_event: Option<RawNameRegistryEvent>,
}

impl RawEventResponse {
    fn payload_count(&self) -> usize {
        usize::from(self.message.is_some())
            + usize::from(self.id_registry_event.is_some())
            + usize::from(self.name_registry_event.is_some())
    }

    pub fn to_bytes(&self) -> HubResult<Vec<u8>> {
        encode_wire(self, "event")
    }

    pub fn from_bytes(bytes: &[u8]) -> HubResult<Self> {
        decode_wire(bytes, "event")
    }
}

/// Wire form of a subscription request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub event_types: Vec<i32>,
}

/// Set of event types a subscriber wants.
///
/// An empty set matches every event. Otherwise an event matches when its
/// type is a member of the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilters {
    pub event_types: BTreeSet<EventType>,
}

impl EventFilters {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific event types.
    #[must_use]
    pub fn of(event_types: impl IntoIterator<Item = EventType>) -> Self {
        Self {
            event_types: event_types.into_iter().collect(),
        }
    }

    /// True when no filtering is applied.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.event_types.is_empty()
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &HubEvent) -> bool {
        self.is_pass_through() || self.event_types.contains(&event.event_type())
    }

    /// Build the wire request for this filter.
    #[must_use]
    pub fn to_request(&self) -> SubscribeRequest {
        SubscribeRequest {
            event_types: self.event_types.iter().map(|t| t.as_i32()).collect(),
        }
    }

    /// Parse a wire request. Unknown event types are rejected.
    pub fn from_request(request: &SubscribeRequest) -> HubResult<Self> {
        let event_types = request
            .event_types
            .iter()
            .map(|value| {
                EventType::try_from(*value)
                    .map_err(|v| HubError::invalid_input(format!("eventTypes: unknown type {v}")))
            })
            .collect::<HubResult<BTreeSet<_>>>()?;
        Ok(Self { event_types })
    }
}

/// Decide whether `event` should be delivered to a subscriber with `filter`.
#[must_use]
pub fn matches(filter: &EventFilters, event: &HubEvent) -> bool {
    filter.matches(event)
}
